//! Replay command - run a recorded pointer scenario through one engine.
//!
//! A scenario is a JSON document with an ordered list of steps:
//!
//! ```json
//! {
//!   "steps": [
//!     { "op": "observe", "resource": 1, "id": "/about" },
//!     { "op": "set_targets", "targets": [
//!         { "id": "/about", "rect": { "left": 500, "top": 280, "right": 600, "bottom": 320 } }
//!     ] },
//!     { "op": "move", "x": 100, "y": 300, "dx": 0, "dy": 0 },
//!     { "op": "move", "x": 140, "y": 300, "dx": 40, "dy": 0 },
//!     { "op": "unobserve", "resource": 1 }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Args;
use intentfetch::config::ConfigFile;
use intentfetch::intent::{
    ElementKey, IntentConfig, MotionSample, Observation, PrefetchIntent, Target, TargetId,
};
use serde::Deserialize;

use crate::error::CliError;

/// Arguments for the replay command.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Scenario JSON file
    pub scenario: PathBuf,

    /// Configuration file to use instead of the user config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum winning score
    #[arg(long)]
    pub max_reach: Option<f64>,

    /// Penalty multiplier for off-axis targets
    #[arg(long)]
    pub perp_weight: Option<f64>,

    /// Minimum smoothed speed in px/sample
    #[arg(long)]
    pub min_speed: Option<f64>,
}

/// A recorded scenario.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub steps: Vec<Step>,
}

/// One scenario step.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    SetTargets { targets: Vec<Target> },
    Move(MotionSample),
    Observe { resource: ElementKey, id: TargetId },
    Unobserve { resource: ElementKey },
}

/// Outcome of a replay.
#[derive(Debug, Default, PartialEq)]
pub struct ReplayReport {
    /// `(sample number, id)` for every trigger, in order.
    pub triggers: Vec<(u64, TargetId)>,
    pub samples: u64,
    pub done: usize,
}

/// Run the replay command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let file = match &args.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let config = resolve_config(&args, &file)?;
    let scenario = load_scenario(&args.scenario)?;

    tracing::debug!(
        steps = scenario.steps.len(),
        max_reach = config.max_reach,
        perp_weight = config.perp_weight,
        min_speed = config.min_speed,
        "Replaying scenario"
    );

    let report = replay(&scenario, config)?;
    for (sample, id) in &report.triggers {
        println!("sample #{} -> {}", sample, id);
    }
    println!(
        "{} samples, {} triggers, {} done",
        report.samples,
        report.triggers.len(),
        report.done
    );

    Ok(())
}

/// Flags override the configuration file, which overrides defaults.
pub fn resolve_config(args: &ReplayArgs, file: &ConfigFile) -> Result<IntentConfig, CliError> {
    let mut file = file.clone();
    if let Some(max_reach) = args.max_reach {
        file.intent.max_reach = max_reach;
    }
    if let Some(perp_weight) = args.perp_weight {
        file.intent.perp_weight = perp_weight;
    }
    if let Some(min_speed) = args.min_speed {
        file.intent.min_speed = min_speed;
    }
    Ok(file.intent_config()?)
}

/// Read and parse a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CliError::ScenarioRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ScenarioParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Run every step of `scenario` through a fresh engine.
pub fn replay(scenario: &Scenario, config: IntentConfig) -> Result<ReplayReport, CliError> {
    let mut intent: PrefetchIntent = PrefetchIntent::new(config)?;
    let mut observations: HashMap<ElementKey, Observation<ElementKey>> = HashMap::new();
    let mut report = ReplayReport::default();

    for step in &scenario.steps {
        match step {
            Step::SetTargets { targets } => {
                intent.set_targets(targets.iter().cloned());
            }
            Step::Move(sample) => {
                if let Some(id) = intent.advance(*sample) {
                    report.triggers.push((intent.motion().sample_count(), id));
                }
            }
            Step::Observe { resource, id } => {
                let observation = intent.observe(*resource, id.clone());
                if let Some(previous) = observations.insert(*resource, observation) {
                    // Superseded by the new registration. Releasing it keeps the new
                    // mapping and re-arms the old id.
                    intent.unobserve(previous);
                }
            }
            Step::Unobserve { resource } => match observations.remove(resource) {
                Some(observation) => {
                    intent.unobserve(observation);
                }
                None => tracing::warn!(resource, "Unobserve for a resource that is not observed"),
            },
        }
    }

    report.samples = intent.motion().sample_count();
    report.done = intent.done_count();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const APPROACH: &str = r#"{
        "steps": [
            { "op": "observe", "resource": 1, "id": "/about" },
            { "op": "set_targets", "targets": [
                { "id": "/about", "rect": { "left": 500, "top": 300, "right": 600, "bottom": 340 } }
            ] },
            { "op": "move", "x": 100, "y": 300, "dx": 0, "dy": 0 },
            { "op": "move", "x": 140, "y": 300, "dx": 40, "dy": 0 },
            { "op": "move", "x": 200, "y": 300, "dx": 60, "dy": 0 }
        ]
    }"#;

    fn args() -> ReplayArgs {
        ReplayArgs {
            scenario: PathBuf::from("unused.json"),
            config: None,
            max_reach: None,
            perp_weight: None,
            min_speed: None,
        }
    }

    fn parse(json: &str) -> Scenario {
        serde_json::from_str(json).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration precedence
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_flags_override_file() {
        let mut file = ConfigFile::default();
        file.intent.max_reach = 800.0;
        file.intent.min_speed = 2.0;

        let mut args = args();
        args.max_reach = Some(250.0);

        let config = resolve_config(&args, &file).unwrap();
        assert_eq!(config.max_reach, 250.0);
        assert_eq!(config.min_speed, 2.0);
        assert_eq!(config.perp_weight, intentfetch::intent::DEFAULT_PERP_WEIGHT);
    }

    #[test]
    fn test_invalid_flag_rejected() {
        let mut args = args();
        args.perp_weight = Some(-1.0);
        assert!(matches!(
            resolve_config(&args, &ConfigFile::default()),
            Err(CliError::InvalidConfig(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Scenario parsing
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_scenario_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(APPROACH.as_bytes()).unwrap();

        let scenario = load_scenario(file.path()).unwrap();
        assert_eq!(scenario.steps.len(), 5);
        assert!(matches!(scenario.steps[2], Step::Move(_)));
    }

    #[test]
    fn test_load_scenario_rejects_unknown_op() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{ "steps": [ { "op": "teleport" } ] }"#)
            .unwrap();

        assert!(matches!(
            load_scenario(file.path()),
            Err(CliError::ScenarioParse { .. })
        ));
    }

    #[test]
    fn test_load_scenario_missing_file() {
        assert!(matches!(
            load_scenario(Path::new("/nonexistent/scenario.json")),
            Err(CliError::ScenarioRead { .. })
        ));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replay
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_replay_reports_trigger_sample() {
        let report = replay(&parse(APPROACH), IntentConfig::default()).unwrap();
        assert_eq!(report.triggers, vec![(3, TargetId::from("/about"))]);
        assert_eq!(report.samples, 3);
        assert_eq!(report.done, 1);
    }

    #[test]
    fn test_replay_unobserve_rearms() {
        let mut json: serde_json::Value = serde_json::from_str(APPROACH).unwrap();
        let steps = json["steps"].as_array().unwrap().clone();
        let mut all = steps.clone();
        all.push(serde_json::json!({ "op": "unobserve", "resource": 1 }));
        all.extend(steps);
        json["steps"] = serde_json::Value::Array(all);

        let scenario: Scenario = serde_json::from_value(json).unwrap();
        let report = replay(&scenario, IntentConfig::default()).unwrap();

        let ids: Vec<&str> = report.triggers.iter().map(|(_, id)| id.as_str()).collect();
        assert_eq!(ids, vec!["/about", "/about"]);
        assert_eq!(report.done, 1);
    }

    #[test]
    fn test_replay_reobserve_rearms_previous_id() {
        let mut json: serde_json::Value = serde_json::from_str(APPROACH).unwrap();
        let steps = json["steps"].as_array().unwrap().clone();
        let mut all = steps.clone();
        all.push(serde_json::json!({ "op": "observe", "resource": 1, "id": "/contact" }));
        all.extend(steps.into_iter().skip(1));
        json["steps"] = serde_json::Value::Array(all);

        let scenario: Scenario = serde_json::from_value(json).unwrap();
        let report = replay(&scenario, IntentConfig::default()).unwrap();

        let ids: Vec<&str> = report.triggers.iter().map(|(_, id)| id.as_str()).collect();
        assert_eq!(ids, vec!["/about", "/about"]);
        assert_eq!(report.done, 1);
    }

    #[test]
    fn test_replay_unknown_unobserve_is_ignored() {
        let scenario = parse(r#"{ "steps": [ { "op": "unobserve", "resource": 9 } ] }"#);
        let report = replay(&scenario, IntentConfig::default()).unwrap();
        assert_eq!(report, ReplayReport::default());
    }
}
