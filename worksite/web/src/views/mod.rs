mod board;
mod capture;
mod home;
mod login;
mod not_found;
mod todo;
mod welcome;

pub use board::IssueBoard;
pub use capture::{FacialAuth, FacialUpload};
pub use home::Home;
pub use login::Login;
pub use not_found::NotFound;
pub use todo::Tasks;
pub use welcome::Welcome;
