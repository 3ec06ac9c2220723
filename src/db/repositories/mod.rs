mod assignment_repository;
mod category_repository;
mod company_repository;
mod submission_repository;
mod tenant_resolver;
mod test_repository;
mod user_repository;

pub use assignment_repository::AssignmentRepository;
pub use category_repository::{CategoryRepository, ExpiredCount};
pub use company_repository::CompanyRepository;
pub use submission_repository::{ScoreRow, SubmissionRepository};
pub use tenant_resolver::TenantResolver;
pub use test_repository::TestRepository;
pub use user_repository::UserRepository;
