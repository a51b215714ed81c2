pub mod audit_logs;
pub mod farmer_details;
pub mod land_images;
pub mod land_requests;
pub mod lands;
pub mod product_images;
pub mod product_requests;
pub mod products;
pub mod profiles;
pub mod sea_orm_active_enums;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use farmer_details::Entity as FarmerDetails;
pub use land_images::Entity as LandImages;
pub use land_requests::Entity as LandRequests;
pub use lands::Entity as Lands;
pub use product_images::Entity as ProductImages;
pub use product_requests::Entity as ProductRequests;
pub use products::Entity as Products;
pub use profiles::Entity as Profiles;
pub use users::Entity as Users;
