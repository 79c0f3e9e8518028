//! Physical constants shared by the Genesis4 and SRW conversions.
//!
//! Both back ends read their factors from here so the two paths cannot drift
//! apart in precision.

use std::f64::consts::PI;

/// Vacuum impedance in ohm (V^2/W), exact closed form.
pub const Z0: f64 = PI * 119.916_983_2_f64;
/// Planck constant times speed of light in eV·Å.
pub const HC_EV_ANGSTROM: f64 = 12_398.425_f64;
pub const ANGSTROM: f64 = 1.0e-10;
/// Elementary charge in coulomb, used for J -> eV.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19_f64;
/// Speed of light in m/s.
pub const C_LIGHT: f64 = 299_792_458.0_f64;
pub const MM_PER_M: f64 = 1_000.0;

/// Central wavelength in meters for a photon energy given in eV.
pub fn wavelength_from_photon_energy_ev(photon_energy_ev: f64) -> f64 {
    HC_EV_ANGSTROM / photon_energy_ev * ANGSTROM
}

/// V/m -> Genesis4 field amplitude for a square cell of side `gridsize`.
pub fn genesis4_field_factor(unit_si: f64, gridsize: f64) -> f64 {
    unit_si * gridsize / (2.0 * Z0).sqrt()
}

/// V/m -> sqrt(W/mm^2).
pub fn srw_field_factor(unit_si: f64) -> f64 {
    unit_si / (2.0 * Z0).sqrt() / MM_PER_M
}

/// SI photon energy in joules -> eV.
pub fn joules_to_ev(energy_joules: f64) -> f64 {
    energy_joules / ELEMENTARY_CHARGE
}

#[cfg(test)]
mod tests {
    use super::{
        C_LIGHT, ELEMENTARY_CHARGE, HC_EV_ANGSTROM, Z0, genesis4_field_factor, joules_to_ev,
        srw_field_factor, wavelength_from_photon_energy_ev,
    };

    #[test]
    fn vacuum_impedance_matches_closed_form() {
        assert!((Z0 - 376.730_313_4).abs() < 1.0e-6);
    }

    #[test]
    fn wavelength_for_one_kev_photon() {
        let wavelength = wavelength_from_photon_energy_ev(1_000.0);
        assert!((wavelength - 12.398_425e-10).abs() <= 1.0e-22);
        assert!((wavelength_from_photon_energy_ev(HC_EV_ANGSTROM) - 1.0e-10).abs() < 1.0e-24);
    }

    #[test]
    fn field_factors_share_the_impedance_normalization() {
        let genesis = genesis4_field_factor(1.0, 1.0);
        let srw = srw_field_factor(1.0);
        assert!((genesis - 1.0 / (2.0 * Z0).sqrt()).abs() <= f64::EPSILON);
        assert!((genesis / srw - 1_000.0).abs() < 1.0e-9);
        assert!((genesis4_field_factor(2.0, 3.0e-6) - 6.0e-6 * genesis).abs() < 1.0e-20);
    }

    #[test]
    fn photon_energy_conversion_uses_exact_charge() {
        assert!((joules_to_ev(ELEMENTARY_CHARGE) - 1.0).abs() <= f64::EPSILON);
        for value in [C_LIGHT, ELEMENTARY_CHARGE, HC_EV_ANGSTROM, Z0] {
            assert!(value.is_finite());
            assert!(value > 0.0);
        }
    }
}
