pub mod auth_service;
pub mod catalog;
pub mod customer_service;
pub mod farmer_service;
pub mod landowner_service;
