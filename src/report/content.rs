//! Literal content of the Synchro PM architecture report.

use crate::model::{Block, DocumentInfo, PageSetup, ReportDocument, TableBlock, TableCell};
use crate::richtext::Span;

use super::styles::{self, *};

pub const DOCUMENT_TITLE: &str = "SynchroPM_Architecture_Documentation";
pub const DOCUMENT_AUTHOR: &str = "Z.ai";
pub const DOCUMENT_CREATOR: &str = "Z.ai";
pub const DOCUMENT_SUBJECT: &str =
    "Multi-Tenant SaaS Project Management System Architecture Documentation";

/// Information dictionary entries of the report.
pub fn document_info() -> DocumentInfo {
    DocumentInfo {
        title: DOCUMENT_TITLE.to_owned(),
        author: DOCUMENT_AUTHOR.to_owned(),
        creator: DOCUMENT_CREATOR.to_owned(),
        subject: DOCUMENT_SUBJECT.to_owned(),
    }
}

fn text(style: &str, content: &str) -> Block {
    Block::paragraph(style, vec![Span::new(content)])
}

fn body(content: &str) -> Block {
    text(BODY, content)
}

fn heading1(title: &str) -> Block {
    Block::heading(HEADING_1, 1, vec![Span::new(title).bold()])
}

fn heading2(title: &str) -> Block {
    Block::heading(HEADING_2, 2, vec![Span::new(title).bold()])
}

fn caption(number: usize, title: &str) -> Block {
    Block::paragraph(
        CAPTION,
        vec![
            Span::new(format!("Table {}.", number)).bold(),
            Span::new(format!(" {}", title)),
        ],
    )
}

fn header(titles: &[&str]) -> Vec<TableCell> {
    titles
        .iter()
        .map(|title| TableCell::new(TABLE_HEADER, vec![Span::new(*title).bold()]))
        .collect()
}

/// One data row; `cell_styles` gives the cell style of every column.
fn row(cell_styles: &[&str], texts: &[&str]) -> Vec<TableCell> {
    cell_styles
        .iter()
        .zip(texts)
        .map(|(style, text)| TableCell::new(*style, vec![Span::new(*text)]))
        .collect()
}

/// Builds a striped table with the report's grid and padding.
fn table(widths: &[f64], titles: &[&str], cell_styles: &[&str], rows: &[&[&str]]) -> Block {
    let table = rows
        .iter()
        .fold(
            TableBlock::new(widths.to_vec()).with_header(header(titles)),
            |table, texts| table.with_row(row(cell_styles, texts)),
        )
        .striped(TABLE_HEADER_BACKGROUND, TABLE_ROW_EVEN, TABLE_ROW_ODD)
        .with_grid(styles::table_grid())
        .with_padding(styles::table_padding());
    Block::table(table)
}

fn cover() -> Vec<Block> {
    vec![
        Block::spacer(120.0),
        Block::paragraph(COVER_TITLE, vec![Span::new("Synchro PM").bold()]),
        Block::spacer(36.0),
        text(COVER_SUBTITLE, "Multi-Tenant SaaS Project Management System"),
        text(COVER_DESCRIPTION, "Complete Architecture Documentation"),
        Block::spacer(48.0),
        text(COVER_VERSION, "Version 1.0"),
        text(COVER_YEAR, "2024"),
        Block::page_break(),
    ]
}

fn executive_summary() -> Vec<Block> {
    vec![
        heading1("1. Executive Summary"),
        body("Synchro PM is a comprehensive, production-ready multi-tenant SaaS project management system designed as a modern alternative to Jira, Redmine, and Asana. Built on Next.js 15 with App Router, it provides a complete solution for organizations to manage projects, tickets, team collaboration, and time tracking with enterprise-grade features."),
        Block::spacer(12.0),
        body("The system features a modern, responsive UI with dark/light theme support, real-time collaboration capabilities, and comprehensive API endpoints for all operations. It is optimized for deployment on Vercel with serverless architecture and edge function support."),
        Block::spacer(18.0),
    ]
}

fn technology_stack() -> Vec<Block> {
    let centered = [TABLE_CELL, TABLE_CELL, TABLE_CELL_LEFT];
    vec![
        heading1("2. Technology Stack"),
        body("The system is built on a modern, Vercel-compatible technology stack:"),
        Block::spacer(12.0),
        table(
            &[1.5, 2.5, 3.0],
            &["Layer", "Technology", "Purpose"],
            &centered,
            &[
                &["Frontend", "Next.js 15 + React 19", "App Router, Server Components"],
                &["Styling", "TailwindCSS 4 + ShadCN UI", "Modern design system"],
                &["State", "Zustand + TanStack Query", "Client & server state management"],
                &["Backend", "Next.js API Routes", "Serverless functions"],
                &["Database", "PostgreSQL (Neon/Supabase)", "Primary data store"],
                &["ORM", "Prisma", "Type-safe database access"],
                &["Auth", "NextAuth.js", "JWT sessions, OAuth"],
                &["Charts", "Recharts", "Data visualization"],
                &["DnD", "@dnd-kit", "Drag and drop"],
            ],
        ),
        Block::spacer(6.0),
        caption(1, "Technology Stack Overview"),
        Block::spacer(18.0),
    ]
}

fn multi_tenant_architecture() -> Vec<Block> {
    let left = [TABLE_CELL, TABLE_CELL_LEFT, TABLE_CELL_LEFT];
    vec![
        heading1("3. Multi-Tenant Architecture"),
        body("The system implements organization-based multi-tenancy where each organization has complete data isolation. Users can belong to multiple organizations with different roles in each. This design enables true SaaS functionality with subscription-based access control."),
        Block::spacer(12.0),
        heading2("3.1 Data Isolation Model"),
        body("All tenant data is scoped at the organization level through foreign key relationships. The Prisma schema enforces cascade deletes to maintain referential integrity while allowing organizations to manage their own data lifecycle. Each organization has isolated projects, tickets, members, and settings."),
        Block::spacer(12.0),
        heading2("3.2 Role-Based Access Control"),
        body("The system implements a 5-tier role hierarchy for fine-grained permissions:"),
        Block::spacer(12.0),
        table(
            &[1.2, 3.3, 2.5],
            &["Role", "Permissions", "Use Case"],
            &left,
            &[
                &["OWNER", "Full organization control, billing, delete org", "Organization founder"],
                &["ADMIN", "Manage members, create/delete projects, approve time", "Team administrator"],
                &["MANAGER", "Create projects, manage team assignments", "Project manager"],
                &["MEMBER", "Create/edit tickets, log time, comment", "Team member"],
                &["GUEST", "Read-only access to assigned projects", "External stakeholder"],
            ],
        ),
        Block::spacer(6.0),
        caption(2, "Role-Based Access Control Hierarchy"),
        Block::spacer(18.0),
    ]
}

fn database_schema() -> Vec<Block> {
    let left = [TABLE_CELL, TABLE_CELL_LEFT, TABLE_CELL_LEFT];
    vec![
        heading1("4. Database Schema"),
        body("The Prisma schema defines 30+ models covering all aspects of project management. The schema is designed for PostgreSQL with proper indexing for performance and cascade delete rules for data integrity."),
        Block::spacer(12.0),
        heading2("4.1 Core Models"),
        table(
            &[1.5, 2.5, 3.0],
            &["Category", "Models", "Description"],
            &left,
            &[
                &["User Management", "User, Account, Session", "Authentication and session management"],
                &["Multi-Tenancy", "Organization, OrganizationMember, OrganizationInvitation", "Tenant isolation and membership"],
                &["Projects", "Project, ProjectMember, Milestone, Module", "Project hierarchy and organization"],
                &["Tickets", "Ticket, TicketDependency, KanbanColumn, Sprint", "Work items and workflow"],
                &["Collaboration", "Comment, Attachment, ChatChannel, ChatMessage", "Team communication"],
                &["Time Tracking", "TimeLog", "Hours logging and approval"],
                &["Automation", "CustomField, CustomFieldValue, Workflow, WorkflowStep", "Extensibility and automation"],
                &["Billing", "Subscription, Invoice", "Stripe-ready billing"],
            ],
        ),
        Block::spacer(6.0),
        caption(3, "Database Model Categories"),
        Block::page_break(),
    ]
}

fn api_endpoints() -> Vec<Block> {
    let centered = [TABLE_CELL, TABLE_CELL, TABLE_CELL_LEFT];
    vec![
        heading1("5. API Endpoints"),
        body("The system provides RESTful API endpoints for all operations, implemented as Next.js API routes. All endpoints require authentication via NextAuth.js JWT sessions and enforce role-based access control."),
        Block::spacer(12.0),
        table(
            &[2.0, 1.5, 3.5],
            &["Endpoint", "Methods", "Description"],
            &centered,
            &[
                &["/api/organizations", "GET, POST", "List and create organizations"],
                &["/api/projects", "GET, POST, PUT, DELETE", "Full project CRUD operations"],
                &["/api/tickets", "GET, POST, PUT, DELETE", "Ticket management with filters"],
                &["/api/comments", "GET, POST, DELETE", "Ticket comments and replies"],
                &["/api/time-logs", "GET, POST, PUT", "Time tracking and approval"],
                &["/api/notifications", "GET, POST, PUT", "User notifications"],
                &["/api/attachments", "GET, POST, DELETE", "File uploads and management"],
            ],
        ),
        Block::spacer(6.0),
        caption(4, "API Endpoints Summary"),
        Block::spacer(18.0),
    ]
}

fn frontend_views() -> Vec<Block> {
    vec![
        heading1("6. Frontend Views"),
        body("The user interface is built as a single-page application with multiple views accessible through sidebar navigation. Each view is optimized for its specific use case while maintaining consistent design language."),
        Block::spacer(12.0),
        table(
            &[1.5, 5.5],
            &["View", "Features"],
            &[TABLE_CELL, TABLE_CELL_LEFT],
            &[
                &["Dashboard", "Statistics cards, productivity charts, sprint burndown, activity feed, priority issues"],
                &["Projects", "Project list with progress, status indicators, member counts, due date tracking"],
                &["Kanban Board", "Drag-and-drop tickets, multiple columns, priority indicators, assignee avatars"],
                &["Gantt Chart", "Timeline visualization, project/task hierarchy, progress bars, zoom controls"],
                &["Calendar", "Monthly calendar, event types, upcoming events sidebar, date selection"],
                &["Team Chat", "Channel list, direct messages, message threading, user presence, file attachments"],
                &["Settings", "Organization settings, billing management, integration configuration"],
            ],
        ),
        Block::spacer(6.0),
        caption(5, "Frontend Views and Features"),
        Block::spacer(18.0),
    ]
}

fn deployment_configuration() -> Vec<Block> {
    let centered = [TABLE_CELL, TABLE_CELL, TABLE_CELL_LEFT];
    vec![
        heading1("7. Deployment Configuration"),
        body("The system is optimized for Vercel deployment with zero-configuration setup. The following environment variables are required for production deployment:"),
        Block::spacer(12.0),
        table(
            &[2.0, 1.0, 4.0],
            &["Variable", "Required", "Description"],
            &centered,
            &[
                &["DATABASE_URL", "Yes", "PostgreSQL connection string"],
                &["NEXTAUTH_SECRET", "Yes", "JWT secret (32+ chars)"],
                &["NEXTAUTH_URL", "Yes", "Production URL"],
                &["GOOGLE_CLIENT_ID", "Optional", "Google OAuth client ID"],
                &["GITHUB_CLIENT_ID", "Optional", "GitHub OAuth client ID"],
                &["PUSHER_KEY", "Optional", "Real-time notifications"],
                &["STRIPE_SECRET_KEY", "Optional", "Billing integration"],
            ],
        ),
        Block::spacer(6.0),
        caption(6, "Environment Variables"),
        Block::spacer(18.0),
    ]
}

fn conclusion() -> Vec<Block> {
    vec![
        heading1("8. Conclusion"),
        body("Synchro PM provides a complete, production-ready solution for organizations seeking a modern project management platform. With its multi-tenant architecture, comprehensive feature set, and Vercel-optimized deployment, it offers an enterprise-grade alternative to established platforms while maintaining flexibility for customization and growth."),
        Block::spacer(12.0),
        body("The system is designed to scale with organizational needs, supporting unlimited organizations through its subscription-ready architecture. Future enhancements can include additional integrations, advanced reporting, and AI-powered features."),
    ]
}

/// Assembles the complete report, typeset in `family`, without rendering it.
pub fn architecture_report(family: &str) -> ReportDocument {
    let blocks = [
        cover(),
        executive_summary(),
        technology_stack(),
        multi_tenant_architecture(),
        database_schema(),
        api_endpoints(),
        frontend_views(),
        deployment_configuration(),
        conclusion(),
    ]
    .into_iter()
    .flatten()
    .collect();

    ReportDocument {
        info: document_info(),
        page: PageSetup::letter(),
        styles: styles::stylesheet(family),
        blocks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn report() -> ReportDocument {
        architecture_report("Times New Roman")
    }

    #[test]
    fn tables_appear_in_fixed_order_with_literal_row_counts() {
        let report = report();
        let tables: Vec<(String, usize)> = report
            .tables()
            .map(|table| (table.rows()[0][0].plain_text(), table.row_count()))
            .collect();
        assert_eq!(
            tables,
            vec![
                ("Layer".to_string(), 10),
                ("Role".to_string(), 6),
                ("Category".to_string(), 9),
                ("Endpoint".to_string(), 8),
                ("View".to_string(), 8),
                ("Variable".to_string(), 8),
            ]
        );
        assert!(report.tables().all(|table| table.validate().is_ok()));
    }

    #[test]
    fn data_rows_alternate_white_and_grey() {
        let report = report();
        let stack = report.tables().next().expect("technology table");
        let backgrounds = stack.row_backgrounds();
        assert_eq!(backgrounds[0], TABLE_HEADER_BACKGROUND);
        assert_eq!(backgrounds[1], TABLE_ROW_EVEN);
        assert_eq!(backgrounds[2], TABLE_ROW_ODD);
        assert_eq!(backgrounds[9], TABLE_ROW_EVEN);
    }

    #[test]
    fn headings_form_the_outline() {
        let report = report();
        let top_level: Vec<String> = report
            .headings()
            .filter(|heading| heading.outline_level() == Some(1))
            .map(|heading| heading.plain_text())
            .collect();
        assert_eq!(top_level.len(), 8);
        assert_eq!(top_level[0], "1. Executive Summary");
        assert_eq!(top_level[7], "8. Conclusion");

        let nested: Vec<String> = report
            .headings()
            .filter(|heading| heading.outline_level() == Some(2))
            .map(|heading| heading.plain_text())
            .collect();
        assert_eq!(
            nested,
            ["3.1 Data Isolation Model", "3.2 Role-Based Access Control", "4.1 Core Models"]
        );
    }

    #[test]
    fn cover_and_schema_end_with_page_breaks() {
        let report = report();
        let breaks = report
            .blocks
            .iter()
            .filter(|block| matches!(block, Block::PageBreak))
            .count();
        assert_eq!(breaks, 2);
        assert_eq!(report.blocks[0], Block::Spacer(120.0));
    }

    #[test]
    fn captions_number_the_tables() {
        let report = report();
        let captions: Vec<String> = report
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(paragraph) if paragraph.style() == CAPTION => {
                    Some(paragraph.plain_text())
                }
                _ => None,
            })
            .collect();
        assert_eq!(captions.len(), 6);
        assert_eq!(captions[0], "Table 1. Technology Stack Overview");
        assert_eq!(captions[5], "Table 6. Environment Variables");
    }

    #[test]
    fn metadata_matches_the_fixed_values() {
        let info = report().info;
        assert_eq!(info.title, "SynchroPM_Architecture_Documentation");
        assert_eq!(info.author, "Z.ai");
        assert_eq!(info.creator, "Z.ai");
        assert_eq!(
            info.subject,
            "Multi-Tenant SaaS Project Management System Architecture Documentation"
        );
    }
}
