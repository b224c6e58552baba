pub mod doctor;
pub mod onboard;
pub mod research;
