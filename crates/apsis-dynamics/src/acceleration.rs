//! Closed set of translational acceleration models.
//!
//! Every acceleration the engine can apply is a variant of
//! [`AccelerationModel`], evaluated through the single dispatch point
//! [`AccelerationModel::evaluate`] against the refreshed [`StateFrame`].
//! Adding a model means adding a variant; there is no open registration.
//!
//! All models return the acceleration of the undergoing body in the
//! inertial frame, in m/s^2. Model parameters are structural and validated
//! before integration starts ([`crate::validate_model_sets`]); state-level
//! degeneracies such as a zero-length separation are evaluation-time
//! failures and abort the arc.

use apsis_core::{BodyId, DynamicsError};
use nalgebra::Vector3;

use crate::frame::StateFrame;

const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Exponential atmosphere attached to an exerting body.
///
/// Density falls off as `ρ(h) = ρ₀ · exp(−h/H)` with `h` the altitude
/// above `surface_radius`. The atmosphere co-rotates rigidly about the
/// inertial z-axis at `rotation_rate`; zero gives a static atmosphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialAtmosphere {
    /// Density at the surface radius, kg/m^3.
    pub surface_density: f64,
    /// Scale height `H`, m.
    pub scale_height: f64,
    /// Mean radius altitude is measured from, m.
    pub surface_radius: f64,
    /// Rigid rotation rate about the inertial z-axis, rad/s.
    pub rotation_rate: f64,
}

impl ExponentialAtmosphere {
    /// Density at `altitude` metres above the surface radius.
    pub fn density_at(&self, altitude: f64) -> f64 {
        self.surface_density * (-altitude / self.scale_height).exp()
    }
}

/// One translational acceleration acting on a propagated body.
#[derive(Debug, Clone, PartialEq)]
pub enum AccelerationModel {
    /// Newtonian point-mass attraction `μ_B (r_B − r_A) / ‖r_B − r_A‖³`
    /// of the exerting body `B` on the undergoing body `A`.
    PointMassGravity,

    /// Point-mass attraction of a perturber as felt in a frame centred on
    /// `central`: the direct term minus the perturber's attraction on the
    /// central body itself.
    ThirdBodyPointMassGravity {
        /// Body the propagation frame is centred on.
        central: BodyId,
    },

    /// Zonal-harmonic correction (J2..J4) to the exerting body's field,
    /// symmetry axis aligned with the inertial z-axis.
    ///
    /// This is the perturbation only; pair it with [`PointMassGravity`]
    /// from the same body for the full field.
    ///
    /// [`PointMassGravity`]: AccelerationModel::PointMassGravity
    ZonalHarmonicGravity {
        /// Reference radius the coefficients are scaled to, m.
        reference_radius: f64,
        /// Degree-2 zonal coefficient (unnormalized).
        j2: f64,
        /// Degree-3 zonal coefficient (unnormalized).
        j3: f64,
        /// Degree-4 zonal coefficient (unnormalized).
        j4: f64,
    },

    /// Radiation pressure from an isotropic source on a cannonball target:
    /// `P = W / (4π c d²)` along the separation unit vector, times
    /// `C_r A / m`.
    CannonballRadiationPressure {
        /// Illuminated cross-section of the target, m^2.
        reference_area: f64,
        /// Radiation pressure coefficient `C_r` (1 absorbing, 2 mirror).
        pressure_coefficient: f64,
        /// Total radiated power `W` of the exerting body, W.
        source_power: f64,
    },

    /// Drag against the exerting body's exponential atmosphere:
    /// `−½ ρ(h) ‖v_rel‖ v_rel · C_D A / m`.
    AerodynamicDrag {
        /// Reference area of the target, m^2.
        reference_area: f64,
        /// Drag coefficient `C_D`.
        drag_coefficient: f64,
        /// Atmosphere of the exerting body.
        atmosphere: ExponentialAtmosphere,
    },
}

impl AccelerationModel {
    /// Short human-readable model name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PointMassGravity => "point-mass gravity",
            Self::ThirdBodyPointMassGravity { .. } => "third-body point-mass gravity",
            Self::ZonalHarmonicGravity { .. } => "zonal-harmonic gravity",
            Self::CannonballRadiationPressure { .. } => "cannonball radiation pressure",
            Self::AerodynamicDrag { .. } => "aerodynamic drag",
        }
    }

    /// The extra body this model reads beyond the exerting body, if any.
    pub fn central_body(&self) -> Option<BodyId> {
        match self {
            Self::ThirdBodyPointMassGravity { central } => Some(*central),
            _ => None,
        }
    }

    /// Evaluate the acceleration of `undergoing` due to `exerting` against
    /// the refreshed `frame`.
    pub fn evaluate(
        &self,
        frame: &StateFrame,
        undergoing: BodyId,
        exerting: BodyId,
    ) -> Result<Vector3<f64>, DynamicsError> {
        let time = frame.time();
        let target = frame.snapshot(undergoing);
        let source = frame.snapshot(exerting);

        match self {
            Self::PointMassGravity => point_mass(
                source.gravitational_parameter,
                &target.position,
                &source.position,
                undergoing,
                exerting,
                time,
            ),

            Self::ThirdBodyPointMassGravity { central } => {
                let central_snapshot = frame.snapshot(*central);
                let direct = point_mass(
                    source.gravitational_parameter,
                    &target.position,
                    &source.position,
                    undergoing,
                    exerting,
                    time,
                )?;
                let indirect = point_mass(
                    source.gravitational_parameter,
                    &central_snapshot.position,
                    &source.position,
                    *central,
                    exerting,
                    time,
                )?;
                Ok(direct - indirect)
            }

            Self::ZonalHarmonicGravity {
                reference_radius,
                j2,
                j3,
                j4,
            } => {
                let relative = target.position - source.position;
                let distance = relative.norm();
                if distance == 0.0 {
                    return Err(DynamicsError::DegenerateSeparation {
                        undergoing,
                        exerting,
                        time,
                    });
                }
                Ok(zonal_field(
                    source.gravitational_parameter,
                    *reference_radius,
                    *j2,
                    *j3,
                    *j4,
                    &relative,
                    distance,
                ))
            }

            Self::CannonballRadiationPressure {
                reference_area,
                pressure_coefficient,
                source_power,
            } => {
                let separation = target.position - source.position;
                let distance = separation.norm();
                if distance == 0.0 {
                    return Err(DynamicsError::DegenerateSeparation {
                        undergoing,
                        exerting,
                        time,
                    });
                }
                let pressure =
                    source_power / (4.0 * std::f64::consts::PI * SPEED_OF_LIGHT * distance * distance);
                let magnitude = pressure * pressure_coefficient * reference_area / target.mass;
                Ok(separation * (magnitude / distance))
            }

            Self::AerodynamicDrag {
                reference_area,
                drag_coefficient,
                atmosphere,
            } => {
                let relative = target.position - source.position;
                let distance = relative.norm();
                if distance == 0.0 {
                    return Err(DynamicsError::DegenerateSeparation {
                        undergoing,
                        exerting,
                        time,
                    });
                }
                let density = atmosphere.density_at(distance - atmosphere.surface_radius);
                let wind = Vector3::new(0.0, 0.0, atmosphere.rotation_rate).cross(&relative);
                let relative_velocity = target.velocity - source.velocity - wind;
                let speed = relative_velocity.norm();
                let scale =
                    -0.5 * density * speed * drag_coefficient * reference_area / target.mass;
                Ok(relative_velocity * scale)
            }
        }
    }
}

fn point_mass(
    mu: f64,
    from: &Vector3<f64>,
    to: &Vector3<f64>,
    undergoing: BodyId,
    exerting: BodyId,
    time: f64,
) -> Result<Vector3<f64>, DynamicsError> {
    let separation = to - from;
    let distance = separation.norm();
    if distance == 0.0 {
        return Err(DynamicsError::DegenerateSeparation {
            undergoing,
            exerting,
            time,
        });
    }
    Ok(separation * (mu / (distance * distance * distance)))
}

/// J2..J4 perturbing acceleration, position relative to the field centre.
fn zonal_field(
    mu: f64,
    radius: f64,
    j2: f64,
    j3: f64,
    j4: f64,
    relative: &Vector3<f64>,
    distance: f64,
) -> Vector3<f64> {
    let (x, y, z) = (relative.x, relative.y, relative.z);
    let z2_d2 = (z / distance) * (z / distance);
    let z4_d4 = z2_d2 * z2_d2;

    let mut accel = Vector3::zeros();

    if j2 != 0.0 {
        let k = -1.5 * j2 * mu * radius.powi(2) / distance.powi(5);
        accel.x += k * x * (1.0 - 5.0 * z2_d2);
        accel.y += k * y * (1.0 - 5.0 * z2_d2);
        accel.z += k * z * (3.0 - 5.0 * z2_d2);
    }
    if j3 != 0.0 {
        let k = -2.5 * j3 * mu * radius.powi(3) / distance.powi(7);
        accel.x += k * x * z * (3.0 - 7.0 * z2_d2);
        accel.y += k * y * z * (3.0 - 7.0 * z2_d2);
        accel.z += k * distance * distance * (6.0 * z2_d2 - 7.0 * z4_d4 - 0.6);
    }
    if j4 != 0.0 {
        let k = 1.875 * j4 * mu * radius.powi(4) / distance.powi(7);
        accel.x += k * x * (1.0 - 14.0 * z2_d2 + 21.0 * z4_d4);
        accel.y += k * y * (1.0 - 14.0 * z2_d2 + 21.0 * z4_d4);
        accel.z += k * z * (5.0 - 70.0 / 3.0 * z2_d2 + 21.0 * z4_d4);
    }

    accel
}

#[cfg(test)]
mod tests {
    use super::*;
    use apsis_bodies::{Body, Environment, EphemerisSource, MassModel};
    use apsis_core::StateLayout;
    use approx::assert_relative_eq;
    use nalgebra::Vector6;

    /// One propagated craft plus fixed environment bodies, frame refreshed
    /// at t = 0 with the craft at `position` / `velocity`.
    fn frame_with(
        craft_mass: Option<f64>,
        position: Vector3<f64>,
        velocity: Vector3<f64>,
        others: Vec<Body>,
    ) -> (StateFrame, BodyId, Vec<BodyId>) {
        let mut environment = Environment::new();
        let mut ids = Vec::new();
        for body in others {
            ids.push(environment.add_body(body).unwrap());
        }
        let mut craft = Body::new("craft");
        if let Some(mass) = craft_mass {
            craft = craft.with_mass(MassModel::Constant(mass));
        }
        let craft_id = environment.add_body(craft).unwrap();

        let layout = StateLayout::new([(craft_id, false)]);
        let mut state = layout.zeros();
        let slot = layout.slot(craft_id).unwrap();
        slot.set_position(&mut state, &position);
        slot.set_velocity(&mut state, &velocity);

        let mut frame = StateFrame::new(environment.len());
        frame
            .refresh(&environment, &layout, &ids, 0.0, &state)
            .unwrap();
        (frame, craft_id, ids)
    }

    fn fixed_at(name: &str, position: Vector3<f64>) -> Body {
        Body::new(name).with_ephemeris(EphemerisSource::Fixed(Vector6::new(
            position.x, position.y, position.z, 0.0, 0.0, 0.0,
        )))
    }

    // ── Point-mass gravity ─────────────────────────────────────────────

    #[test]
    fn point_mass_pulls_toward_the_attractor() {
        let mu = 3.986004418e14;
        let d = 7.0e6;
        let (frame, craft, ids) = frame_with(
            None,
            Vector3::new(d, 0.0, 0.0),
            Vector3::zeros(),
            vec![fixed_at("earth", Vector3::zeros()).with_gravitational_parameter(mu)],
        );

        let accel = AccelerationModel::PointMassGravity
            .evaluate(&frame, craft, ids[0])
            .unwrap();
        assert_relative_eq!(accel.x, -mu / (d * d), max_relative = 1e-15);
        assert_eq!(accel.y, 0.0);
        assert_eq!(accel.z, 0.0);
    }

    #[test]
    fn coincident_bodies_are_degenerate() {
        let (frame, craft, ids) = frame_with(
            None,
            Vector3::zeros(),
            Vector3::zeros(),
            vec![fixed_at("earth", Vector3::zeros()).with_gravitational_parameter(3.986e14)],
        );

        let result = AccelerationModel::PointMassGravity.evaluate(&frame, craft, ids[0]);
        match result {
            Err(DynamicsError::DegenerateSeparation {
                undergoing,
                exerting,
                ..
            }) => {
                assert_eq!(undergoing, craft);
                assert_eq!(exerting, ids[0]);
            }
            other => panic!("expected DegenerateSeparation, got {other:?}"),
        }
    }

    // ── Third-body gravity ─────────────────────────────────────────────

    #[test]
    fn third_body_vanishes_at_the_central_body() {
        // A craft sitting exactly at the central body feels direct and
        // indirect terms that cancel.
        let mu_sun = 1.327e20;
        let (frame, craft, ids) = frame_with(
            None,
            Vector3::zeros(),
            Vector3::zeros(),
            vec![
                fixed_at("earth", Vector3::zeros()),
                fixed_at("sun", Vector3::new(1.496e11, 0.0, 0.0))
                    .with_gravitational_parameter(mu_sun),
            ],
        );

        let model = AccelerationModel::ThirdBodyPointMassGravity { central: ids[0] };
        let accel = model.evaluate(&frame, craft, ids[1]).unwrap();
        assert_eq!(accel, Vector3::zeros());
    }

    #[test]
    fn third_body_leaves_only_the_tidal_term() {
        let mu_sun = 1.327e20;
        let sun_distance = 1.496e11;
        let craft_distance = 4.0e8;
        let (frame, craft, ids) = frame_with(
            None,
            Vector3::new(craft_distance, 0.0, 0.0),
            Vector3::zeros(),
            vec![
                fixed_at("earth", Vector3::zeros()),
                fixed_at("sun", Vector3::new(sun_distance, 0.0, 0.0))
                    .with_gravitational_parameter(mu_sun),
            ],
        );

        let model = AccelerationModel::ThirdBodyPointMassGravity { central: ids[0] };
        let accel = model.evaluate(&frame, craft, ids[1]).unwrap();

        let direct = mu_sun / ((sun_distance - craft_distance) * (sun_distance - craft_distance));
        let indirect = mu_sun / (sun_distance * sun_distance);
        assert_relative_eq!(accel.x, direct - indirect, max_relative = 1e-12);
        // Tidal residual is orders of magnitude below the direct pull.
        assert!(accel.norm() < 1e-4 * direct);
    }

    // ── Zonal harmonics ────────────────────────────────────────────────

    #[test]
    fn j2_pulls_inward_at_the_equator_and_outward_at_the_pole() {
        let mu = 3.986004418e14;
        let radius = 6.378137e6;
        let j2 = 1.08263e-3;
        let d = 7.0e6;
        let model = AccelerationModel::ZonalHarmonicGravity {
            reference_radius: radius,
            j2,
            j3: 0.0,
            j4: 0.0,
        };

        let (frame, craft, ids) = frame_with(
            None,
            Vector3::new(d, 0.0, 0.0),
            Vector3::zeros(),
            vec![fixed_at("earth", Vector3::zeros()).with_gravitational_parameter(mu)],
        );
        let equatorial = model.evaluate(&frame, craft, ids[0]).unwrap();
        let expected = 1.5 * j2 * mu * radius * radius / d.powi(4);
        assert_relative_eq!(equatorial.x, -expected, max_relative = 1e-12);
        assert_eq!(equatorial.y, 0.0);
        assert_eq!(equatorial.z, 0.0);

        let (frame, craft, ids) = frame_with(
            None,
            Vector3::new(0.0, 0.0, d),
            Vector3::zeros(),
            vec![fixed_at("earth", Vector3::zeros()).with_gravitational_parameter(mu)],
        );
        let polar = model.evaluate(&frame, craft, ids[0]).unwrap();
        assert_relative_eq!(polar.z, 2.0 * expected, max_relative = 1e-12);
        assert_eq!(polar.x, 0.0);
        assert_eq!(polar.y, 0.0);
    }

    #[test]
    fn j3_pushes_along_z_at_the_equator() {
        // The pear-shape term has no in-plane component on the equator but
        // a net z-push that J2 and J4 lack there.
        let mu = 3.986004418e14;
        let radius = 6.378137e6;
        let j3 = -2.53e-6;
        let d = 7.0e6;
        let model = AccelerationModel::ZonalHarmonicGravity {
            reference_radius: radius,
            j2: 0.0,
            j3,
            j4: 0.0,
        };

        let (frame, craft, ids) = frame_with(
            None,
            Vector3::new(d, 0.0, 0.0),
            Vector3::zeros(),
            vec![fixed_at("earth", Vector3::zeros()).with_gravitational_parameter(mu)],
        );
        let accel = model.evaluate(&frame, craft, ids[0]).unwrap();

        let expected = 1.5 * j3 * mu * radius.powi(3) / d.powi(5);
        assert_relative_eq!(accel.z, expected, max_relative = 1e-12);
        assert_eq!(accel.x, 0.0);
        assert_eq!(accel.y, 0.0);
    }

    // ── Radiation pressure ─────────────────────────────────────────────

    #[test]
    fn radiation_pressure_is_radial_and_inverse_square() {
        let solar_power = 3.828e26;
        let model = AccelerationModel::CannonballRadiationPressure {
            reference_area: 20.0,
            pressure_coefficient: 1.3,
            source_power: solar_power,
        };
        let d = 1.496e11;
        let mass = 1200.0;

        let (frame, craft, ids) = frame_with(
            Some(mass),
            Vector3::new(d, 0.0, 0.0),
            Vector3::zeros(),
            vec![fixed_at("sun", Vector3::zeros())],
        );
        let near = model.evaluate(&frame, craft, ids[0]).unwrap();

        let pressure = solar_power / (4.0 * std::f64::consts::PI * SPEED_OF_LIGHT * d * d);
        let expected = pressure * 1.3 * 20.0 / mass;
        assert_relative_eq!(near.x, expected, max_relative = 1e-12);
        assert_eq!(near.y, 0.0);

        let (frame, craft, ids) = frame_with(
            Some(mass),
            Vector3::new(2.0 * d, 0.0, 0.0),
            Vector3::zeros(),
            vec![fixed_at("sun", Vector3::zeros())],
        );
        let far = model.evaluate(&frame, craft, ids[0]).unwrap();
        assert_relative_eq!(far.x, expected / 4.0, max_relative = 1e-12);
    }

    // ── Aerodynamic drag ───────────────────────────────────────────────

    fn test_atmosphere(rotation_rate: f64) -> ExponentialAtmosphere {
        ExponentialAtmosphere {
            surface_density: 1.225,
            scale_height: 8.5e3,
            surface_radius: 6.378137e6,
            rotation_rate,
        }
    }

    #[test]
    fn drag_opposes_the_airspeed_vector() {
        let atmosphere = test_atmosphere(0.0);
        let model = AccelerationModel::AerodynamicDrag {
            reference_area: 4.0,
            drag_coefficient: 2.2,
            atmosphere,
        };
        let altitude = 200.0e3;
        let d = atmosphere.surface_radius + altitude;
        let speed = 7.8e3;
        let mass = 500.0;

        let (frame, craft, ids) = frame_with(
            Some(mass),
            Vector3::new(d, 0.0, 0.0),
            Vector3::new(0.0, speed, 0.0),
            vec![fixed_at("earth", Vector3::zeros())],
        );
        let accel = model.evaluate(&frame, craft, ids[0]).unwrap();

        let density = atmosphere.density_at(altitude);
        let expected = 0.5 * density * speed * speed * 2.2 * 4.0 / mass;
        assert_relative_eq!(accel.y, -expected, max_relative = 1e-12);
        assert_eq!(accel.x, 0.0);
        assert_eq!(accel.z, 0.0);
    }

    #[test]
    fn corotating_atmosphere_cancels_for_a_corotating_craft() {
        let rotation_rate = 7.2921159e-5;
        let atmosphere = test_atmosphere(rotation_rate);
        let model = AccelerationModel::AerodynamicDrag {
            reference_area: 4.0,
            drag_coefficient: 2.2,
            atmosphere,
        };
        let d = atmosphere.surface_radius + 300.0e3;

        // Craft velocity equals the local atmosphere velocity ω ẑ × r.
        let (frame, craft, ids) = frame_with(
            Some(500.0),
            Vector3::new(d, 0.0, 0.0),
            Vector3::new(0.0, rotation_rate * d, 0.0),
            vec![fixed_at("earth", Vector3::zeros())],
        );
        let accel = model.evaluate(&frame, craft, ids[0]).unwrap();
        assert_eq!(accel, Vector3::zeros());
    }

    #[test]
    fn density_falls_by_e_per_scale_height() {
        let atmosphere = test_atmosphere(0.0);
        let ratio = atmosphere.density_at(atmosphere.scale_height) / atmosphere.surface_density;
        assert_relative_eq!(ratio, (-1.0f64).exp(), max_relative = 1e-15);
    }
}
