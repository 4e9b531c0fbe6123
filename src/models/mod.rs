pub mod participant;
pub mod trip;
