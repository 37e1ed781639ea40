//! Control enablement and status text, derived from playback state.
//!
//! Nothing here is stored. [`Affordances::derive`] is recomputed from the
//! [`Playback`] state, the in-flight flags and the last failed workflow after
//! every transition, so the controls can never drift out of sync with the
//! data.

use std::fmt;

use crate::model::ClusterCount;
use crate::playback::{Phase, Playback};
use crate::session::RequestKind;

/// Which backend requests are pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InFlight {
    /// A dataset generation request is pending.
    pub generate: bool,
    /// A run request is pending, for this cluster count.
    pub run: Option<ClusterCount>,
}

/// One UI control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    /// Whether the control accepts input.
    pub enabled: bool,
    /// Button caption.
    pub label: &'static str,
}

/// The complete UI surface: three controls and two read-only displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordances {
    /// Generate / regenerate dataset.
    pub generate: Control,
    /// Run k-means with the selected cluster count.
    pub run: Control,
    /// Step to the next iteration.
    pub advance: Control,
    /// Iteration display.
    pub iteration: String,
    /// Generic status line.
    pub status: String,
}

impl Affordances {
    /// Derive every control and display from playback state, pending
    /// requests and the workflow whose last backend call failed, if any.
    /// Each control is blocked only by its own workflow.
    #[must_use]
    pub fn derive(
        playback: &Playback,
        in_flight: InFlight,
        last_failure: Option<RequestKind>,
    ) -> Self {
        let phase = playback.phase();
        let has_dataset = phase != Phase::Empty;

        let generate = Control {
            enabled: !in_flight.generate,
            label: if in_flight.generate {
                "Generating..."
            } else if last_failure == Some(RequestKind::Generate) {
                "Generate New Data (Error)"
            } else if has_dataset {
                "Regenerate Data"
            } else {
                "Generate Data"
            },
        };

        let run = Control {
            enabled: has_dataset && in_flight.run.is_none(),
            label: if in_flight.run.is_some() {
                "Running..."
            } else {
                "Run K-Means"
            },
        };

        let advance = Control {
            enabled: playback.can_advance() && in_flight.run.is_none(),
            label: "Next Step",
        };

        let iteration = match (in_flight.run, playback.current()) {
            (Some(_), _) => "Calculating...".to_owned(),
            (None, Some(snapshot)) => snapshot.iteration.to_string(),
            (None, None) => "N/A".to_owned(),
        };

        Self {
            generate,
            run,
            advance,
            iteration,
            status: status_line(playback, in_flight, last_failure),
        }
    }
}

/// Convergence message for a run whose final snapshot has `iteration`.
#[must_use]
pub fn converged_text(iteration: u32) -> String {
    let noun = if iteration == 1 { "iteration" } else { "iterations" };
    format!("Converged after {iteration} {noun}.")
}

fn status_line(
    playback: &Playback,
    in_flight: InFlight,
    last_failure: Option<RequestKind>,
) -> String {
    if in_flight.generate {
        return "Generating dataset...".to_owned();
    }
    if let Some(k) = in_flight.run {
        return format!("Running k-means with k = {k}...");
    }
    match last_failure {
        Some(RequestKind::Generate) => {
            return "Dataset generation failed. Try again.".to_owned();
        }
        Some(RequestKind::Run) => {
            return "K-means run failed. Try again.".to_owned();
        }
        None => {}
    }
    match (playback.dataset(), playback.run(), playback.current()) {
        (None, _, _) => "Generate a dataset to begin.".to_owned(),
        (Some(dataset), None, _) => {
            format!("{} samples loaded. Choose k and run.", dataset.len())
        }
        (Some(_), Some(_), Some(snapshot)) if playback.is_terminal() => {
            converged_text(snapshot.iteration)
        }
        (Some(_), Some(run), _) => format!(
            "Step {} of {}.",
            playback.cursor().map_or(0, |c| c + 1),
            run.len()
        ),
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.enabled { "" } else { " (disabled)" };
        write!(f, "[{}{mark}]", self.label)
    }
}

impl fmt::Display for Affordances {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} | iteration: {} | {}",
            self.generate, self.run, self.advance, self.iteration, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dataset, Run, Sample, Snapshot};

    fn loaded(steps: u32) -> Playback {
        let mut playback = Playback::new();
        playback.load_dataset(
            Dataset::new(vec![Sample::new(0.0, 0.0), Sample::new(1.0, 1.0)])
                .unwrap(),
        );
        if steps > 0 {
            let run = Run::new(
                (1..=steps)
                    .map(|iteration| Snapshot {
                        iteration,
                        labels: vec![0, 0],
                        centroids: vec![Sample::new(0.5, 0.5)],
                    })
                    .collect(),
            );
            let _ = playback.load_run(run).unwrap();
        }
        playback
    }

    #[test]
    fn empty_state_only_allows_generate() {
        let a = Affordances::derive(&Playback::new(), InFlight::default(), None);
        assert!(a.generate.enabled);
        assert_eq!(a.generate.label, "Generate Data");
        assert!(!a.run.enabled);
        assert!(!a.advance.enabled);
        assert_eq!(a.iteration, "N/A");
    }

    #[test]
    fn dataset_loaded_enables_run() {
        let a = Affordances::derive(&loaded(0), InFlight::default(), None);
        assert!(a.run.enabled);
        assert!(!a.advance.enabled);
        assert_eq!(a.generate.label, "Regenerate Data");
        assert_eq!(a.status, "2 samples loaded. Choose k and run.");
    }

    #[test]
    fn run_loaded_enables_advance_until_terminal() {
        let mut playback = loaded(2);
        let a = Affordances::derive(&playback, InFlight::default(), None);
        assert!(a.advance.enabled);
        assert_eq!(a.iteration, "1");
        assert_eq!(a.status, "Step 1 of 2.");

        let _ = playback.advance().unwrap();
        let a = Affordances::derive(&playback, InFlight::default(), None);
        assert!(!a.advance.enabled);
        assert_eq!(a.iteration, "2");
        assert_eq!(a.status, "Converged after 2 iterations.");
    }

    #[test]
    fn pending_generate_disables_only_generate() {
        let in_flight = InFlight {
            generate: true,
            run: None,
        };
        let a = Affordances::derive(&loaded(2), in_flight, None);
        assert!(!a.generate.enabled);
        assert_eq!(a.generate.label, "Generating...");
        assert!(a.run.enabled);
        assert!(a.advance.enabled);
        assert_eq!(a.status, "Generating dataset...");
    }

    #[test]
    fn pending_run_disables_run_and_advance() {
        let in_flight = InFlight {
            generate: false,
            run: ClusterCount::new(3),
        };
        let a = Affordances::derive(&loaded(2), in_flight, None);
        assert!(a.generate.enabled);
        assert!(!a.run.enabled);
        assert!(!a.advance.enabled);
        assert_eq!(a.iteration, "Calculating...");
        assert_eq!(a.status, "Running k-means with k = 3...");
    }

    #[test]
    fn single_iteration_run_reads_singular() {
        let a = Affordances::derive(&loaded(1), InFlight::default(), None);
        assert!(!a.advance.enabled);
        assert_eq!(a.status, "Converged after 1 iteration.");
        assert_eq!(converged_text(3), "Converged after 3 iterations.");
    }

    #[test]
    fn failed_generate_is_reflected_in_caption_and_status() {
        let a = Affordances::derive(
            &Playback::new(),
            InFlight::default(),
            Some(RequestKind::Generate),
        );
        assert!(a.generate.enabled);
        assert_eq!(a.generate.label, "Generate New Data (Error)");
        assert_eq!(a.status, "Dataset generation failed. Try again.");

        let pending = InFlight {
            generate: true,
            run: None,
        };
        let a = Affordances::derive(
            &Playback::new(),
            pending,
            Some(RequestKind::Generate),
        );
        assert_eq!(a.generate.label, "Generating...");
        assert_eq!(a.status, "Generating dataset...");
    }

    #[test]
    fn failed_run_keeps_controls_and_reports() {
        let a = Affordances::derive(
            &loaded(2),
            InFlight::default(),
            Some(RequestKind::Run),
        );
        assert!(a.run.enabled);
        assert!(a.advance.enabled);
        assert_eq!(a.generate.label, "Regenerate Data");
        assert_eq!(a.iteration, "1");
        assert_eq!(a.status, "K-means run failed. Try again.");
    }

    #[test]
    fn display_marks_disabled_controls() {
        let a = Affordances::derive(&Playback::new(), InFlight::default(), None);
        let line = a.to_string();
        assert!(line.starts_with("[Generate Data] [Run K-Means (disabled)]"));
        assert!(line.contains("iteration: N/A"));
    }
}
