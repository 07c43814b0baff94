//! studytrack-ingest: load assignment snapshots and grading schemes, and pull grading
//! breakdowns and due dates out of syllabus text.

pub mod assignments;
pub mod parsers;
pub mod scheme;

pub use assignments::{
    load_assignments, load_assignments_csv, load_assignments_json, parse_assignments_csv,
    parse_assignments_json,
};
pub use parsers::syllabus::{parse_syllabus_breakdown, parse_syllabus_schedule};
pub use scheme::{load_scheme, parse_scheme_json};
