pub mod article_store;
pub mod config;
pub mod html_validator;
pub mod link_inserter;
pub mod repair_job;
pub mod server;
pub mod utils;

pub use article_store::{Article, ArticleSelection, ArticleStore, DocumentStore, LinkCandidate};
pub use config::{ConfigError, ServiceConfig};
pub use html_validator::{
    HtmlValidator, Issue, IssueKind, RepairOutcome, RepairStep, ValidationResult, ValidationStats,
    ValidatorLimits, quick_validate_html, repair_content, validate_and_repair_html,
};
pub use link_inserter::{InternalLinker, LinkInsertion, LinkRequest, LinkerLimits};
pub use repair_job::{RepairJob, RepairRequest, RepairResponse, RepairResult, RepairSummary};
pub use server::ApiError;
