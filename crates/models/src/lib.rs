pub mod db;
pub mod errors;
pub mod todo;
pub mod user;
pub mod user_token;
