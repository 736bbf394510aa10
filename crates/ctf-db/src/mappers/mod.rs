//! Entity to model mappers
//!
//! - `TryFrom<Model> for Entity`: Convert database rows to domain objects
//! - `*Row` structs: Prepare entity data for database writes

mod ctf;

pub use ctf::CtfRow;
