mod building;
mod hospital;
pub mod models;
mod pacer;
mod registry_error;

pub use building::BuildingRegistryClient;
pub use hospital::HospitalRegistryClient;
pub use pacer::Pacer;
pub use registry_error::RegistryError;
