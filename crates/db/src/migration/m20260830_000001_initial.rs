//! Initial schema: catalog, CMS, CRM, ledger, and audit tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS audit_logs, co_ownerships, expenses, payments, invoices,
             payment_schedules, deals, clients, company_info, page_content, contact_leads,
             project_media, projects, property_images, properties, services, users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Users (backoffice accounts)
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    name VARCHAR(255),
    role VARCHAR(50),
    is_staff BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Storefront services
CREATE TABLE services (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    title VARCHAR(255),
    description TEXT,
    content TEXT,
    icon VARCHAR(500),
    slug VARCHAR(255) UNIQUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Property listings
CREATE TABLE properties (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    slug VARCHAR(255) NOT NULL UNIQUE,
    title VARCHAR(255) NOT NULL,
    location VARCHAR(255),
    price NUMERIC(16, 2),
    status VARCHAR(100),
    category VARCHAR(100),
    description TEXT,
    area NUMERIC(12, 2),
    bedrooms INTEGER,
    bathrooms INTEGER,
    cover_image VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE property_images (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    url VARCHAR(500) NOT NULL,
    alt VARCHAR(255),
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_property_images_property ON property_images(property_id, sort_order);

-- Development projects
CREATE TABLE projects (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    slug VARCHAR(255) NOT NULL UNIQUE,
    title VARCHAR(255) NOT NULL,
    description TEXT,
    status VARCHAR(100),
    category VARCHAR(100),
    location VARCHAR(255),
    surface NUMERIC(12, 2),
    units INTEGER,
    cover_image VARCHAR(500),
    started_at TIMESTAMPTZ,
    delivered_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE project_media (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    kind VARCHAR(50) NOT NULL DEFAULT 'image',
    url VARCHAR(500) NOT NULL,
    alt VARCHAR(255),
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX idx_project_media_project ON project_media(project_id, sort_order);

-- Contact-form leads
CREATE TABLE contact_leads (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    phone VARCHAR(50),
    message TEXT NOT NULL,
    property_id UUID REFERENCES properties(id) ON DELETE SET NULL,
    status VARCHAR(50) NOT NULL DEFAULT 'new',
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_contact_leads_created ON contact_leads(created_at DESC);

-- CMS page blocks, upsert on the (page, section, key) triple
CREATE TABLE page_content (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    page VARCHAR(100) NOT NULL,
    section VARCHAR(100) NOT NULL,
    key VARCHAR(100) NOT NULL,
    value TEXT,
    CONSTRAINT uq_page_content_triple UNIQUE (page, section, key)
);

-- Company info blocks
CREATE TABLE company_info (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    key VARCHAR(100) NOT NULL UNIQUE,
    value TEXT NOT NULL,
    category VARCHAR(100) NOT NULL,
    label VARCHAR(255),
    sort_order INTEGER NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true
);

-- CRM
CREATE TABLE clients (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255),
    phone VARCHAR(50),
    address VARCHAR(500),
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE deals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    client_id UUID NOT NULL REFERENCES clients(id),
    property_id UUID REFERENCES properties(id),
    kind VARCHAR(50) NOT NULL DEFAULT 'sale',
    amount NUMERIC(16, 2),
    status VARCHAR(50) NOT NULL DEFAULT 'open',
    notes TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_deals_created ON deals(created_at DESC);

-- Ledger
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    deal_id UUID NOT NULL REFERENCES deals(id),
    invoice_id UUID,
    schedule_id UUID,
    amount NUMERIC(16, 2) NOT NULL,
    method VARCHAR(50),
    reference VARCHAR(255),
    paid_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE payment_schedules (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    deal_id UUID NOT NULL REFERENCES deals(id) ON DELETE CASCADE,
    due_date DATE NOT NULL,
    amount NUMERIC(16, 2) NOT NULL,
    status VARCHAR(50) NOT NULL DEFAULT 'pending',
    payment_id UUID REFERENCES payments(id) ON DELETE SET NULL
);

CREATE INDEX idx_payment_schedules_deal ON payment_schedules(deal_id, due_date);

CREATE TABLE invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    deal_id UUID NOT NULL REFERENCES deals(id),
    number VARCHAR(50) NOT NULL UNIQUE,
    amount NUMERIC(16, 2) NOT NULL,
    status VARCHAR(50) NOT NULL DEFAULT 'open',
    issue_date DATE NOT NULL DEFAULT CURRENT_DATE,
    due_date DATE
);

CREATE INDEX idx_invoices_issue_date ON invoices(issue_date DESC);

ALTER TABLE payments
    ADD CONSTRAINT fk_payments_invoice FOREIGN KEY (invoice_id) REFERENCES invoices(id),
    ADD CONSTRAINT fk_payments_schedule FOREIGN KEY (schedule_id) REFERENCES payment_schedules(id);

CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    label VARCHAR(255) NOT NULL,
    category VARCHAR(100),
    amount NUMERIC(16, 2) NOT NULL,
    spent_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    notes TEXT
);

CREATE TABLE co_ownerships (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    property_id UUID NOT NULL REFERENCES properties(id) ON DELETE CASCADE,
    client_id UUID NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
    share NUMERIC(7, 6) NOT NULL DEFAULT 0
);

CREATE INDEX idx_co_ownerships_property ON co_ownerships(property_id);

-- Audit trail (best-effort writes, never transactional with the action)
CREATE TABLE audit_logs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID REFERENCES users(id) ON DELETE SET NULL,
    action VARCHAR(20) NOT NULL,
    entity VARCHAR(100) NOT NULL,
    entity_id UUID,
    before JSONB,
    after JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_logs_created ON audit_logs(created_at DESC);
";
