//! The voice leading session
//!
//! A [`Session`] owns the state the host's messages mutate: the current
//! chord, the stored root and the target. Each update is validated first and
//! rejected without touching state. Target updates recalculate as soon as a
//! current chord is present; [`Session::recalculate`] runs the same pipeline
//! on demand.

use crate::config::SessionConfig;
use crate::error::{Result, VoiceLeadingError};
use crate::solver::{geometric_coordinates, DistanceMatrix, Problem, Strategy};
use crate::types::calculation::{missing_coverage, Calculation, CoverageStage, Warning};
use crate::types::pitch::{
    in_range, octave_of, prime_form, reduce, Pitch, PitchClass, MAX_PITCH, MIN_PITCH, MODULUS,
};
use crate::types::target::TargetSpec;
use crate::voicing::{generate_voicings, select_anchor};
use tracing::{debug, warn};

/// Concrete candidates for one pass, and where they came from
struct Candidates {
    pitches: Vec<Pitch>,
    anchor_octave: Option<i32>,
    warnings: Vec<Warning>,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    current: Vec<Pitch>,
    root: PitchClass,
    target: Option<TargetSpec>,
    last: Option<Calculation>,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            config: SessionConfig::default(),
            current: Vec::new(),
            root: PitchClass::C,
            target: None,
            last: None,
        }
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Session {
            config,
            ..Session::default()
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Replace the configuration. Session state is kept, so a voice limit
    /// below the stored chord or target is refused.
    pub fn set_config(&mut self, config: SessionConfig) -> Result<()> {
        let stored = self
            .current
            .len()
            .max(self.target.as_ref().map_or(0, TargetSpec::len));
        let result = config.validate().and_then(|()| {
            if stored > config.max_voices {
                Err(VoiceLeadingError::InvalidConfig(format!(
                    "max_voices {} is below the {} voices already stored",
                    config.max_voices, stored
                )))
            } else {
                Ok(())
            }
        });
        if let Err(e) = result {
            warn!(error = %e, "configuration rejected");
            return Err(e);
        }
        self.config = config;
        Ok(())
    }

    pub fn current(&self) -> &[Pitch] {
        &self.current
    }

    pub fn target(&self) -> Option<&TargetSpec> {
        self.target.as_ref()
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// The most recent successful calculation
    pub fn last_calculation(&self) -> Option<&Calculation> {
        self.last.as_ref()
    }

    fn check_size(&self, what: &'static str, len: usize) -> Result<()> {
        let result = if len == 0 {
            Err(VoiceLeadingError::EmptyInput { what })
        } else if len > self.config.max_voices {
            Err(VoiceLeadingError::InputTooLarge {
                what,
                len,
                max: self.config.max_voices,
            })
        } else {
            Ok(())
        };
        if let Err(e) = &result {
            warn!(error = %e, "update rejected");
        }
        result
    }

    /// Replace the current chord. Does not recalculate.
    pub fn set_current_chord(&mut self, pitches: &[Pitch]) -> Result<()> {
        self.check_size("voices", pitches.len())?;
        if let Some(&pitch) = pitches.iter().find(|&&p| !in_range(p)) {
            let e = VoiceLeadingError::PitchOutOfRange {
                pitch,
                min: MIN_PITCH,
                max: MAX_PITCH,
            };
            warn!(error = %e, "update rejected");
            return Err(e);
        }
        self.current = pitches.to_vec();
        if self.config.debug {
            debug!(current = ?self.current, "current chord set");
        }
        Ok(())
    }

    /// Set explicit target pitch classes and recalculate if a current chord
    /// is present
    pub fn set_target_absolute(&mut self, pitch_classes: &[i32]) -> Result<Option<Calculation>> {
        self.check_size("target pitch classes", pitch_classes.len())?;
        self.set_target(TargetSpec::absolute(pitch_classes), self.root)
    }

    /// Set a root + intervals target and recalculate if a current chord is
    /// present. The root is remembered for later chord structures.
    pub fn set_target_relative(
        &mut self,
        root: i32,
        intervals: &[i32],
    ) -> Result<Option<Calculation>> {
        self.check_size("intervals", intervals.len())?;
        self.set_target(TargetSpec::relative(root, intervals), reduce(root))
    }

    /// New intervals over the stored root
    pub fn set_chord_structure(&mut self, intervals: &[i32]) -> Result<Option<Calculation>> {
        self.set_target_relative(self.root.as_pitch(), intervals)
    }

    /// Store a new root. A relative target is re-rooted and recalculated;
    /// an absolute one is left alone.
    pub fn set_root(&mut self, root: i32) -> Result<Option<Calculation>> {
        let root = reduce(root);
        match &self.target {
            Some(spec @ TargetSpec::Relative { .. }) => {
                let rerooted = spec.with_root(root);
                self.set_target(rerooted, root)
            }
            _ => {
                self.root = root;
                if self.config.debug {
                    debug!(root = %self.root, "root stored");
                }
                Ok(None)
            }
        }
    }

    /// Store a target and root, then recalculate. When the calculation is
    /// rejected both are put back.
    fn set_target(&mut self, target: TargetSpec, root: PitchClass) -> Result<Option<Calculation>> {
        if self.config.debug {
            debug!(%target, %root, "target set");
        }
        let previous_target = self.target.replace(target);
        let previous_root = std::mem::replace(&mut self.root, root);
        if self.current.is_empty() {
            return Ok(None);
        }
        match self.recalculate() {
            Ok(calculation) => Ok(Some(calculation)),
            Err(e) => {
                self.target = previous_target;
                self.root = previous_root;
                Err(e)
            }
        }
    }

    pub fn set_feedback(&mut self, enabled: bool) {
        self.config.feedback = enabled;
    }

    pub fn set_debug(&mut self, enabled: bool) {
        self.config.debug = enabled;
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.config.strategy = strategy;
    }

    fn missing_data(&self) -> VoiceLeadingError {
        VoiceLeadingError::MissingData {
            current: self.current.len(),
            target: self.target.as_ref().map_or(0, TargetSpec::len),
        }
    }

    /// Candidate pitches for the configured strategy
    fn candidates(&self, target: &[PitchClass]) -> Result<Candidates> {
        let strategy = self.config.strategy;

        if strategy.uses_voicings() {
            let anchor = select_anchor(
                &self.current,
                target,
                self.config.octave_range,
                self.config.anchor,
            )?;
            let voicings = generate_voicings(
                anchor.octave,
                target,
                self.config.octave_range,
                self.config.candidate_cap,
            );
            if self.config.debug {
                debug!(
                    octave = anchor.octave,
                    displacement = %anchor.displacement,
                    strategies = ?voicings.strategies,
                    candidates = ?voicings.candidates,
                    "voicings generated"
                );
            }
            return Ok(Candidates {
                pitches: voicings.candidates,
                anchor_octave: Some(anchor.octave),
                warnings: voicings.warnings,
            });
        }

        if strategy == Strategy::Orbifold {
            // Target placed in the register of the current bass
            let octave = self
                .current
                .first()
                .map(|&bass| octave_of(bass))
                .ok_or_else(|| self.missing_data())?;
            return Ok(Candidates {
                pitches: target
                    .iter()
                    .map(|pc| octave * MODULUS + pc.as_pitch())
                    .collect(),
                anchor_octave: Some(octave),
                warnings: Vec::new(),
            });
        }

        Ok(Candidates {
            pitches: target.iter().map(|pc| pc.as_pitch()).collect(),
            anchor_octave: None,
            warnings: Vec::new(),
        })
    }

    /// Run the full pipeline against the current state.
    ///
    /// Emits one [`Calculation`]. With feedback on, the output replaces the
    /// current chord. A failed pass leaves the session untouched.
    pub fn recalculate(&mut self) -> Result<Calculation> {
        let target = match &self.target {
            Some(target) if !self.current.is_empty() && !target.is_empty() => target.clone(),
            _ => {
                let e = self.missing_data();
                warn!(error = %e, "recalculation skipped");
                return Err(e);
            }
        };

        match self.calculate(&target) {
            Ok(calculation) => {
                for warning in &calculation.warnings {
                    warn!(%warning, "calculation warning");
                }
                if self.config.feedback {
                    self.current = calculation.output.clone();
                }
                self.last = Some(calculation.clone());
                Ok(calculation)
            }
            Err(e) => {
                warn!(error = %e, strategy = %self.config.strategy, "calculation rejected");
                Err(e)
            }
        }
    }

    fn calculate(&self, target: &TargetSpec) -> Result<Calculation> {
        let strategy = self.config.strategy;
        let pitch_classes = target.pitch_classes();
        let required = target.required();

        if self.config.debug {
            debug!(
                %strategy,
                current = ?self.current,
                target = ?pitch_classes,
                "calculation started"
            );
        }

        let candidates = self.candidates(&pitch_classes)?;
        let solver = strategy.solver(&self.config);
        let solution = solver.solve(&Problem {
            current: &self.current,
            candidates: &candidates.pitches,
            required: &required,
        })?;
        let output = solution.output();

        let mut warnings = candidates.warnings;
        warnings.extend(solution.warnings);
        warnings.extend(missing_coverage(&output, &required, CoverageStage::Result));

        let coordinates = match strategy {
            Strategy::Orbifold => geometric_coordinates(&output),
            _ => None,
        };
        let target_values: Vec<Pitch> = pitch_classes.iter().map(|pc| pc.as_pitch()).collect();

        if self.config.debug {
            debug!(
                solver = solver.name(),
                ?output,
                cost = solution.cost,
                "calculation finished"
            );
        }

        Ok(Calculation {
            cost: solution.cost,
            anchor_octave: candidates.anchor_octave,
            candidate_count: candidates.pitches.len(),
            voice_count: self.current.len(),
            warnings,
            strategy,
            target: pitch_classes,
            moves: solution.moves,
            current_prime_form: prime_form(&self.current),
            target_prime_form: prime_form(&target_values),
            coordinates,
            output,
        })
    }

    /// Square distance matrix between the current chord and the target in
    /// close position at its anchor octave
    pub fn distance_matrix(&self) -> Result<DistanceMatrix> {
        let target = match &self.target {
            Some(target) if !self.current.is_empty() && !target.is_empty() => target,
            _ => return Err(self.missing_data()),
        };
        let pitch_classes = target.pitch_classes();
        let anchor = select_anchor(
            &self.current,
            &pitch_classes,
            self.config.octave_range,
            self.config.anchor,
        )?;
        let close: Vec<Pitch> = pitch_classes
            .iter()
            .map(|pc| anchor.base_pitch() + pc.as_pitch())
            .collect();
        Ok(DistanceMatrix::square(&self.current, &close))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = SessionConfig::default().with_max_voices(0);
        assert!(matches!(
            Session::new(config),
            Err(VoiceLeadingError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_target_without_current_does_not_calculate() {
        let mut session = Session::default();
        assert_eq!(session.set_target_absolute(&[0, 4, 7]), Ok(None));
        assert!(session.target().is_some());
    }

    #[test]
    fn test_empty_update_is_rejected() {
        let mut session = Session::default();
        session.set_current_chord(&[60]).unwrap();
        assert_eq!(
            session.set_current_chord(&[]),
            Err(VoiceLeadingError::EmptyInput { what: "voices" })
        );
        assert_eq!(session.current(), &[60]);
    }

    #[test]
    fn test_out_of_range_pitch_is_rejected() {
        let mut session = Session::default();
        session.set_current_chord(&[60]).unwrap();
        assert_eq!(
            session.set_current_chord(&[48, i32::MAX]),
            Err(VoiceLeadingError::PitchOutOfRange {
                pitch: i32::MAX,
                min: MIN_PITCH,
                max: MAX_PITCH,
            })
        );
        assert_eq!(session.current(), &[60]);
    }

    #[test]
    fn test_smaller_voice_limit_is_refused_while_chord_is_stored() {
        let mut session = Session::default();
        session
            .set_current_chord(&[36, 43, 48, 52, 55, 60])
            .unwrap();
        let result = session.set_config(SessionConfig::default().with_max_voices(4));
        assert!(matches!(result, Err(VoiceLeadingError::InvalidConfig(_))));
        assert_eq!(session.config().max_voices, 8);
        assert_eq!(session.current().len(), 6);

        assert!(session
            .set_config(SessionConfig::default().with_max_voices(6))
            .is_ok());
    }

    #[test]
    fn test_smaller_voice_limit_is_refused_while_target_is_stored() {
        let mut session = Session::default();
        session.set_target_absolute(&[0, 2, 4, 5, 7]).unwrap();
        assert!(session
            .set_config(SessionConfig::default().with_max_voices(4))
            .is_err());
    }

    #[test]
    fn test_unbounded_octave_range_is_refused() {
        let mut session = Session::default();
        let config = SessionConfig::default().with_octave_range(0, i32::MAX / 12);
        assert!(session.set_config(config).is_err());
        assert_eq!(session.config().octave_range.max, 4);
    }

    #[test]
    fn test_rejected_reroot_keeps_root_and_target() {
        let config = SessionConfig::default().with_strategy(Strategy::Bijective);
        let mut session = Session::new(config).unwrap();
        session.set_current_chord(&[48, 52, 55]).unwrap();
        session.set_target_relative(0, &[0, 4, 7]).unwrap();

        let result = session.set_target_relative(2, &[0, 7]);
        assert!(matches!(result, Err(VoiceLeadingError::SizeMismatch { .. })));
        assert_eq!(session.root(), PitchClass::C);
        assert_eq!(session.target(), Some(&TargetSpec::relative(0, &[0, 4, 7])));
    }

    #[test]
    fn test_root_reroots_relative_target() {
        let mut session = Session::default();
        session.set_chord_structure(&[0, 4, 7]).unwrap();
        session.set_root(2).unwrap();
        let values: Vec<u8> = session
            .target()
            .unwrap()
            .pitch_classes()
            .iter()
            .map(|pc| pc.value())
            .collect();
        assert_eq!(values, vec![2, 6, 9]);
    }

    #[test]
    fn test_root_leaves_absolute_target() {
        let mut session = Session::default();
        session.set_current_chord(&[60, 64, 67]).unwrap();
        session.set_target_absolute(&[0, 4, 7]).unwrap();
        assert_eq!(session.set_root(5), Ok(None));
        assert_eq!(session.target(), Some(&TargetSpec::absolute(&[0, 4, 7])));
        assert_eq!(session.root(), reduce(5));
    }

    #[test]
    fn test_orbifold_places_target_at_bass_octave() {
        let config = SessionConfig::default().with_strategy(Strategy::Orbifold);
        let mut session = Session::new(config).unwrap();
        session.set_current_chord(&[48, 52, 55, 58]).unwrap();
        let calculation = session.set_target_absolute(&[5, 9, 0, 3]).unwrap().unwrap();
        assert_eq!(calculation.anchor_octave, Some(4));
        assert_eq!(calculation.candidate_count, 4);
        assert!(calculation.coordinates.is_some());
        let mut output = calculation.output.clone();
        output.sort();
        assert_eq!(output, vec![48, 51, 53, 57]);
    }

    #[test]
    fn test_distance_matrix_is_square() {
        let mut session = Session::default();
        session.set_current_chord(&[48, 52, 55, 60]).unwrap();
        session.set_target_absolute(&[0, 4, 7]).unwrap();
        let matrix = session.distance_matrix().unwrap();
        assert_eq!(matrix.rows(), 4);
        assert_eq!(matrix.get(0, 0), Some(0));
        assert_eq!(matrix.get(0, 3), Some(crate::solver::HIGH_COST));
    }
}
