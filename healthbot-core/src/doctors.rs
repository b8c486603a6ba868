//! Doctor lookup for a matched disease.

use crate::knowledge::DoctorRecord;

/// Doctors that treat `disease_name`, compared case-insensitively, in
/// directory order. An empty result means no specialist is listed.
pub fn recommend<'a>(disease_name: &str, doctors: &'a [DoctorRecord]) -> Vec<&'a DoctorRecord> {
    doctors.iter().filter(|doctor| doctor.treats(disease_name)).collect()
}
