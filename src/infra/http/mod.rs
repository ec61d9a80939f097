pub mod params;
pub mod response;
