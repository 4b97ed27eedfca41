mod contact;

pub use contact::{Contact, ContactBody};
