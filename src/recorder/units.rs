//! Kernel units (MeV, mm) and persisted units (GeV, km).

use crate::ledger::Kinematics;

use super::kernel::Vec3;

/// One MeV in kernel energy units
pub const MEV: f64 = 1.0;
/// One GeV in kernel energy units
pub const GEV: f64 = 1.0e3 * MEV;
/// One millimetre in kernel length units
pub const MM: f64 = 1.0;
/// One kilometre in kernel length units
pub const KM: f64 = 1.0e6 * MM;

/// Kernel energy to GeV
#[inline]
pub fn to_gev(energy: f64) -> f64 {
    energy / GEV
}

/// Kernel length to km
#[inline]
pub fn to_km(length: f64) -> f64 {
    length / KM
}

/// Persisted kinematics from kernel-unit energy, position and direction
pub fn kinematics(kinetic_energy: f64, position: Vec3, direction: Vec3) -> Kinematics {
    Kinematics {
        ke: to_gev(kinetic_energy),
        x: to_km(position.x),
        y: to_km(position.y),
        z: to_km(position.z),
        px: direction.x,
        py: direction.y,
        pz: direction.z,
    }
}
