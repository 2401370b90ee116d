pub mod catalog;
pub mod csv_io;
pub mod doctor;

pub use catalog::DataCatalog;
pub use csv_io::{read_csv, read_csv_sample, write_csv};
pub use doctor::{DatasetCheck, DoctorReport, MissingColumn, run_doctor};
