//! Structural validation of a model configuration against an environment.
//!
//! [`validate_model_sets`] runs once before any integration starts. Every
//! check here is about configuration shape, not state: a configuration
//! that passes can still fail at evaluation time (a zero-length
//! separation, a singular inertia tensor), but it can never fail because
//! a model references a body, property, or parameter that does not exist.

use apsis_bodies::Environment;
use apsis_core::{BodyId, StateLayout};

use crate::acceleration::AccelerationModel;
use crate::model_set::ModelSetMap;
use crate::torque::TorqueModel;

use std::error::Error;
use std::fmt;

/// Errors from model-set validation (setup-time, never per-step).
#[derive(Debug, Clone, PartialEq)]
pub enum ModelSetupError {
    /// A model set targets a body the job does not propagate.
    ModelsForUnpropagatedBody {
        /// The targeted body.
        body: BodyId,
    },

    /// A model entry references a body missing from the environment.
    UnknownBody {
        /// Body the models act on.
        undergoing: BodyId,
        /// The missing reference.
        body: BodyId,
        /// Which model kind holds the reference.
        kind: &'static str,
    },

    /// A body exerts a model on itself.
    SelfReference {
        /// The body in question.
        body: BodyId,
        /// Which model kind holds the reference.
        kind: &'static str,
    },

    /// A gravity model's exerting body has no gravitational parameter.
    MissingGravitationalParameter {
        /// The exerting body.
        body: BodyId,
        /// Which model kind needs it.
        kind: &'static str,
    },

    /// A surface-force model's undergoing body has no mass model.
    MissingMass {
        /// The undergoing body.
        body: BodyId,
        /// Which model kind needs it.
        kind: &'static str,
    },

    /// A body with rotational state has no inertia model.
    MissingInertia {
        /// The body in question.
        body: BodyId,
    },

    /// A third-body model's central body equals the undergoing body.
    ///
    /// The direct and indirect terms would cancel identically; the plain
    /// point-mass model is the one wanted here.
    ThirdBodyCentralIsUndergoing {
        /// The undergoing body.
        undergoing: BodyId,
        /// The configured central body.
        central: BodyId,
    },

    /// A torque targets a body propagated without rotational state.
    TorqueOnTranslationalBody {
        /// The targeted body.
        body: BodyId,
    },

    /// A referenced non-propagated body has no ephemeris source.
    MissingEphemeris {
        /// The body in question.
        body: BodyId,
    },

    /// A model parameter is non-finite or out of its valid range.
    InvalidParameter {
        /// Which model kind.
        kind: &'static str,
        /// Which parameter.
        parameter: &'static str,
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ModelSetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelsForUnpropagatedBody { body } => {
                write!(f, "model set targets body {body} which is not propagated")
            }
            Self::UnknownBody {
                undergoing,
                body,
                kind,
            } => {
                write!(
                    f,
                    "{kind} on body {undergoing} references unknown body {body}"
                )
            }
            Self::SelfReference { body, kind } => {
                write!(f, "{kind} on body {body} references the body itself")
            }
            Self::MissingGravitationalParameter { body, kind } => {
                write!(
                    f,
                    "{kind} requires a gravitational parameter on exerting body {body}"
                )
            }
            Self::MissingMass { body, kind } => {
                write!(f, "{kind} requires a mass model on undergoing body {body}")
            }
            Self::MissingInertia { body } => {
                write!(
                    f,
                    "rotational propagation of body {body} requires an inertia model"
                )
            }
            Self::ThirdBodyCentralIsUndergoing { undergoing, central } => {
                write!(
                    f,
                    "third-body central {central} equals undergoing body {undergoing}; \
                     use point-mass gravity instead"
                )
            }
            Self::TorqueOnTranslationalBody { body } => {
                write!(
                    f,
                    "torque on body {body} which is propagated without rotational state"
                )
            }
            Self::MissingEphemeris { body } => {
                write!(
                    f,
                    "referenced body {body} is not propagated and has no ephemeris source"
                )
            }
            Self::InvalidParameter {
                kind,
                parameter,
                value,
            } => {
                write!(
                    f,
                    "{kind} parameter '{parameter}' must be finite and positive, got {value}"
                )
            }
        }
    }
}

impl Error for ModelSetupError {}

/// Validate `models` against `environment` and the propagation `layout`.
///
/// Checks performed, in order:
///
/// 1. Model sets only target propagated bodies.
/// 2. Every entry references existing bodies and never the undergoing
///    body itself; variant parameters are finite and positive; gravity
///    variants find a gravitational parameter and surface forces a mass
///    model; torques only target bodies with rotational state.
/// 3. Every body propagated with rotational state carries an inertia
///    model for Euler's equation.
/// 4. Every referenced body the job does not propagate carries an
///    ephemeris source.
pub fn validate_model_sets(
    environment: &Environment,
    layout: &StateLayout,
    models: &ModelSetMap,
) -> Result<(), ModelSetupError> {
    // 1. Only propagated bodies may carry model sets
    for (undergoing, _) in models.iter() {
        if layout.slot(undergoing).is_none() {
            return Err(ModelSetupError::ModelsForUnpropagatedBody { body: undergoing });
        }
    }

    // 2. Per-entry references, parameters, and property requirements
    for (undergoing, set) in models.iter() {
        for (exerting, model) in set.accelerations() {
            check_reference(environment, undergoing, exerting, model.kind())?;
            match model {
                AccelerationModel::PointMassGravity => {
                    require_gravitational_parameter(environment, exerting, model.kind())?;
                }
                AccelerationModel::ThirdBodyPointMassGravity { central } => {
                    require_gravitational_parameter(environment, exerting, model.kind())?;
                    if environment.body(*central).is_none() {
                        return Err(ModelSetupError::UnknownBody {
                            undergoing,
                            body: *central,
                            kind: model.kind(),
                        });
                    }
                    if *central == undergoing {
                        return Err(ModelSetupError::ThirdBodyCentralIsUndergoing {
                            undergoing,
                            central: *central,
                        });
                    }
                }
                AccelerationModel::ZonalHarmonicGravity {
                    reference_radius, ..
                } => {
                    require_gravitational_parameter(environment, exerting, model.kind())?;
                    require_positive(model.kind(), "reference_radius", *reference_radius)?;
                }
                AccelerationModel::CannonballRadiationPressure {
                    reference_area,
                    pressure_coefficient,
                    source_power,
                } => {
                    require_mass(environment, undergoing, model.kind())?;
                    require_positive(model.kind(), "reference_area", *reference_area)?;
                    require_positive(model.kind(), "pressure_coefficient", *pressure_coefficient)?;
                    require_positive(model.kind(), "source_power", *source_power)?;
                }
                AccelerationModel::AerodynamicDrag {
                    reference_area,
                    drag_coefficient,
                    atmosphere,
                } => {
                    require_mass(environment, undergoing, model.kind())?;
                    require_positive(model.kind(), "reference_area", *reference_area)?;
                    require_positive(model.kind(), "drag_coefficient", *drag_coefficient)?;
                    require_positive(model.kind(), "surface_density", atmosphere.surface_density)?;
                    require_positive(model.kind(), "scale_height", atmosphere.scale_height)?;
                    require_positive(model.kind(), "surface_radius", atmosphere.surface_radius)?;
                    if !atmosphere.rotation_rate.is_finite() {
                        return Err(ModelSetupError::InvalidParameter {
                            kind: model.kind(),
                            parameter: "rotation_rate",
                            value: atmosphere.rotation_rate,
                        });
                    }
                }
            }
        }

        for (exerting, model) in set.torques() {
            check_reference(environment, undergoing, exerting, model.kind())?;
            let rotational = layout
                .slot(undergoing)
                .is_some_and(|slot| slot.has_rotation());
            if !rotational {
                return Err(ModelSetupError::TorqueOnTranslationalBody { body: undergoing });
            }
            if let TorqueModel::GravityGradient = model {
                require_gravitational_parameter(environment, exerting, model.kind())?;
            }
        }
    }

    // 3. Rotational state needs an inertia model for Euler's equation
    for slot in layout.slots() {
        if !slot.has_rotation() {
            continue;
        }
        if let Some(record) = environment.body(slot.body()) {
            if record.inertia.is_none() {
                return Err(ModelSetupError::MissingInertia { body: slot.body() });
            }
        }
    }

    // 4. Non-propagated referenced bodies supply state through an ephemeris
    for (_, set) in models.iter() {
        for (exerting, model) in set.accelerations() {
            require_ephemeris(environment, layout, exerting)?;
            if let Some(central) = model.central_body() {
                require_ephemeris(environment, layout, central)?;
            }
        }
        for (exerting, _) in set.torques() {
            require_ephemeris(environment, layout, exerting)?;
        }
    }

    Ok(())
}

fn check_reference(
    environment: &Environment,
    undergoing: BodyId,
    body: BodyId,
    kind: &'static str,
) -> Result<(), ModelSetupError> {
    if environment.body(body).is_none() {
        return Err(ModelSetupError::UnknownBody {
            undergoing,
            body,
            kind,
        });
    }
    if body == undergoing {
        return Err(ModelSetupError::SelfReference { body, kind });
    }
    Ok(())
}

fn require_gravitational_parameter(
    environment: &Environment,
    body: BodyId,
    kind: &'static str,
) -> Result<(), ModelSetupError> {
    let present = environment
        .body(body)
        .is_some_and(|record| record.gravitational_parameter.is_some());
    if !present {
        return Err(ModelSetupError::MissingGravitationalParameter { body, kind });
    }
    Ok(())
}

fn require_mass(
    environment: &Environment,
    body: BodyId,
    kind: &'static str,
) -> Result<(), ModelSetupError> {
    let present = environment
        .body(body)
        .is_some_and(|record| record.mass.is_some());
    if !present {
        return Err(ModelSetupError::MissingMass { body, kind });
    }
    Ok(())
}

fn require_ephemeris(
    environment: &Environment,
    layout: &StateLayout,
    body: BodyId,
) -> Result<(), ModelSetupError> {
    if layout.slot(body).is_some() {
        return Ok(());
    }
    let present = environment
        .body(body)
        .is_some_and(|record| record.ephemeris.is_some());
    if !present {
        return Err(ModelSetupError::MissingEphemeris { body });
    }
    Ok(())
}

fn require_positive(
    kind: &'static str,
    parameter: &'static str,
    value: f64,
) -> Result<(), ModelSetupError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ModelSetupError::InvalidParameter {
            kind,
            parameter,
            value,
        });
    }
    Ok(())
}
