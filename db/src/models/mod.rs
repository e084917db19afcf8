pub mod assignment;
pub mod batch;
pub mod batch_response;
pub mod datatype;
pub mod question;
pub mod response;
pub mod student;
pub mod submission;

pub use assignment::Entity as Assignment;
pub use batch::Entity as Batch;
pub use batch_response::Entity as BatchResponse;
pub use datatype::Entity as Datatype;
pub use question::Entity as Question;
pub use response::Entity as Response;
pub use student::Entity as Student;
pub use submission::Entity as Submission;
