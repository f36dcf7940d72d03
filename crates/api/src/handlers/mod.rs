pub mod account;
pub mod adopter;
pub mod doctor;
pub mod pet;
pub mod upload;
