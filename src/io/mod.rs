mod csv;
mod stl;
mod tri;

pub use csv::{
    read_sensitivity_csv, read_sensitivity_csv_file, write_sensitivity_csv,
    write_sensitivity_tables, SENSITIVITY_HEADER,
};
pub use stl::{save_stl, write_stl_ascii};
pub use tri::{
    append_point_data, append_sensitivities_to_tri, append_sensitivities_to_tri_file,
    format_scientific, read_tri_points,
};
