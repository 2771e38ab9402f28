pub mod health;
pub mod images;
pub mod patients;
pub mod records;
pub mod users;
