//! Drives one planning run: human factors, then diagnose → score → explain
//! for every subject, then the strategic and tactical views.

use std::collections::HashSet;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use crate::config::PlannerConfig;
use crate::diagnostics::hysteresis::GateDecision;
use crate::diagnostics::Diagnoser;
use crate::error::{BundleError, StudyError};
use crate::human_factors::{cognitive_capacity, HumanFactorEntry};
use crate::metrics::PlanningMetrics;
use crate::planner::{Plan, PlanAssembler, RankedSubject};
use crate::priority::PriorityEngine;
use crate::reasoning::explain;
use crate::sessions::{sessions_for_subject, StudySession};
use crate::subjects::model::{HysteresisRecord, StrategicState, SubjectInCycle};
use crate::subjects::store::CycleRecord;

/// All inputs of one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleBundle {
    pub cycle: CycleRecord,
    pub sessions: Vec<StudySession>,
    pub human_factor_today: Option<HumanFactorEntry>,
    pub human_factor_history: Vec<HumanFactorEntry>,
    /// Reference date for recency decay and plan staleness
    pub today: NaiveDate,
}

impl CycleBundle {
    pub fn new(cycle: CycleRecord, today: NaiveDate) -> Self {
        CycleBundle {
            cycle,
            sessions: Vec::new(),
            human_factor_today: None,
            human_factor_history: Vec::new(),
            today,
        }
    }

    pub fn validate(&self) -> Result<(), BundleError> {
        let mut seen = HashSet::new();
        for subject in &self.cycle.subjects {
            if !seen.insert(subject.id) {
                return Err(BundleError::DuplicateSubject(subject.id));
            }
            if subject.cycle_id != self.cycle.cycle_id {
                return Err(BundleError::ForeignSubject {
                    subject_id: subject.id,
                    expected: self.cycle.cycle_id,
                    found: subject.cycle_id,
                });
            }
        }
        for unit in &self.cycle.work_units {
            if !seen.contains(&unit.subject_id) {
                return Err(BundleError::OrphanWorkUnit {
                    unit_id: unit.id,
                    subject_id: unit.subject_id,
                });
            }
        }
        Ok(())
    }
}

/// Resolved state of one subject after a run, handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectStateUpdate {
    pub subject_id: i64,
    pub strategic_state: StrategicState,
    pub hysteresis: HysteresisRecord,
    pub gate: GateDecision,
}

/// Receives one update per subject per run.
pub trait StateSink {
    fn persist(&mut self, update: &SubjectStateUpdate) -> Result<(), StudyError>;
}

impl<F> StateSink for F
where
    F: FnMut(&SubjectStateUpdate) -> Result<(), StudyError>,
{
    fn persist(&mut self, update: &SubjectStateUpdate) -> Result<(), StudyError> {
        self(update)
    }
}

/// Keeps updates in memory until the caller writes them out.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    pub updates: Vec<SubjectStateUpdate>,
}

impl StateSink for CollectingSink {
    fn persist(&mut self, update: &SubjectStateUpdate) -> Result<(), StudyError> {
        self.updates.push(update.clone());
        Ok(())
    }
}

/// Summary sentence naming the top one or two subjects.
pub fn compose_cycle_focus(first_run: bool, ranked: &[RankedSubject]) -> String {
    let top: Vec<&str> = ranked.iter().take(2).map(|s| s.name.as_str()).collect();
    match (first_run, top.as_slice()) {
        (_, []) => "No active subjects in this cycle yet. Add one to get a plan.".to_string(),
        (true, [only]) => format!("Welcome! Let's get started by exploring {}.", only),
        (true, [first, second, ..]) => {
            format!("Welcome! Let's get started by exploring {} and {}.", first, second)
        }
        (false, [only]) => format!("This cycle's focus: {}.", only),
        (false, [first, second, ..]) => {
            format!("This cycle's focus: {}, followed by {}.", first, second)
        }
    }
}

pub struct Tutor {
    config: PlannerConfig,
    metrics: PlanningMetrics,
}

impl Tutor {
    pub fn new(config: PlannerConfig, metrics: PlanningMetrics) -> Self {
        Tutor { config, metrics }
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Tutor::new(config, PlanningMetrics::new())
    }

    pub fn metrics(&self) -> &PlanningMetrics {
        &self.metrics
    }

    fn assembler(&self, cycle: &CycleRecord) -> PlanAssembler {
        PlanAssembler {
            strategy: cycle.strategy.unwrap_or(self.config.strategy),
            available_minutes: cycle.available_minutes.unwrap_or(self.config.available_minutes),
            block_duration_minutes: cycle
                .block_duration_minutes
                .unwrap_or(self.config.block_duration_minutes),
            cycle_duration_days: cycle
                .cycle_duration_days
                .unwrap_or(self.config.cycle_duration_days),
        }
    }

    /// Run the whole pipeline. Any error aborts the run; updates already
    /// handed to `sink` belong to a run the caller must discard.
    pub fn generate_plan<S: StateSink + ?Sized>(
        &self,
        bundle: &CycleBundle,
        sink: &mut S,
    ) -> Result<Plan, StudyError> {
        bundle.validate()?;
        let assembler = self.assembler(&bundle.cycle);
        if assembler.available_minutes == 0 {
            return Err(BundleError::NoAvailableTime.into());
        }
        self.metrics.record_run();

        let subjects: Vec<&SubjectInCycle> =
            bundle.cycle.subjects.iter().filter(|s| s.is_active).collect();
        let first_run = subjects.iter().all(|s| s.hysteresis.is_pristine());

        let capacity = cognitive_capacity(
            bundle.human_factor_today.as_ref(),
            &bundle.human_factor_history,
        );
        tracing::info!(
            cycle_id = bundle.cycle.cycle_id,
            subjects = subjects.len(),
            cognitive_multiplier = capacity.multiplier,
            "Planning run started"
        );

        let discovery: Vec<SubjectInCycle> = subjects
            .iter()
            .filter(|s| s.strategic_state == StrategicState::Discovery)
            .map(|s| (*s).clone())
            .collect();
        let engine = PriorityEngine::new(
            capacity.multiplier,
            &discovery,
            bundle.cycle.previous_cycle.clone(),
        );
        let diagnoser = Diagnoser::new(bundle.today);

        let mut ranked = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let history = sessions_for_subject(&bundle.sessions, subject.id);
            let diagnosis = diagnoser.run(subject, &history);
            let priority = engine.score(subject, &diagnosis.diagnostics);
            let reasoning = explain(&subject.name, &diagnosis.diagnostics, &priority.flags);

            sink.persist(&SubjectStateUpdate {
                subject_id: subject.id,
                strategic_state: diagnosis.diagnostics.strategic_mode,
                hysteresis: diagnosis.hysteresis.clone(),
                gate: diagnosis.gate,
            })
            .map_err(|e| e.with_subject(subject.id))?;

            self.metrics.record_subject();
            if diagnosis.gate.vetoed() {
                self.metrics.record_veto();
            }
            self.metrics.record_flags(&priority.flags);

            ranked.push(RankedSubject {
                subject_id: subject.id,
                name: subject.name.clone(),
                diagnostics: diagnosis.diagnostics,
                priority,
                reasoning,
            });
        }

        ranked.sort_by(|a, b| {
            b.priority
                .final_priority
                .partial_cmp(&a.priority.final_priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let plan_scaffold = assembler.strategic_view(&ranked);
        let sequenced_plan = assembler.tactical_view(&ranked, &plan_scaffold, &bundle.cycle.work_units);
        let cycle_focus = compose_cycle_focus(first_run, &ranked);

        tracing::info!(
            cycle_id = bundle.cycle.cycle_id,
            tasks = sequenced_plan.len(),
            alternatives = plan_scaffold.alternative_plans.len(),
            "Planning run finished"
        );

        Ok(Plan {
            cycle_id: bundle.cycle.cycle_id,
            generated_on: bundle.today,
            cycle_focus,
            sequenced_plan,
            plan_scaffold,
            processed_subjects: ranked,
        })
    }
}

impl Default for Tutor {
    fn default() -> Self {
        Tutor::with_config(PlannerConfig::default())
    }
}
