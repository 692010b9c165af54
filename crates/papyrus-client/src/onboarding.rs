//! Company-profile onboarding walk.
//!
//! The flow walks a JSON taxonomy one question at a time. Every step keeps
//! the continuation it was created from, so answering an earlier step can
//! truncate the tail and re-plan from there.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use papyrus_entity::onboarding::{CompanyDetail, OnboardingProfile, normalize_web};

use crate::error::RemoteError;
use crate::remote::RemoteFolderStore;

/// First question; its options are the taxonomy's company types.
pub const TIPO_EMPRESA: &str = "tipo_empresa";
/// Free-text step asked when the company type is "Otro".
pub const EMPRESA_OTRO_DETALLE: &str = "empresa_otro_detalle";
/// Multi-select interests asked once the taxonomy is exhausted.
pub const MOTIVACION_PRINCIPAL: &str = "motivacion_principal";
/// Headcount bracket.
pub const NUM_EMPLEADOS: &str = "num_empleados";
/// Company website, the last step.
pub const WEB_EMPRESA: &str = "web_empresa";

/// Headcount brackets offered by the `num_empleados` step.
pub const HEADCOUNT_OPTIONS: [&str; 4] = ["0-20", "20-100", "100-1000", "+1000"];

const OTHER: &str = "otro";
const OTHER_DETAIL_SUFFIX: &str = "_otro_detalle";
const FIXED_KEYS: [&str; 4] = [TIPO_EMPRESA, MOTIVACION_PRINCIPAL, NUM_EMPLEADOS, WEB_EMPRESA];

/// Taxonomy questions that accept several options, by company type.
const MULTI_SELECT: [(&str, &str); 3] = [
    ("despacho", "pregunta_area_practica"),
    ("empresa_regulada", "pregunta_sector"),
    ("empresa_regulada", "pregunta_actividad"),
];

/// Errors raised while walking the taxonomy.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The taxonomy JSON has the wrong shape.
    #[error("invalid taxonomy: {0}")]
    Taxonomy(String),

    /// The taxonomy file could not be read.
    #[error("cannot read taxonomy: {0}")]
    Io(#[from] std::io::Error),

    /// The taxonomy file is not JSON.
    #[error("cannot parse taxonomy: {0}")]
    Parse(#[from] serde_json::Error),

    /// No step at that index, or nothing left to answer.
    #[error("step {0} does not exist")]
    StepOutOfRange(usize),

    /// Blank text or no option picked.
    #[error("an answer is required")]
    EmptyAnswer,

    /// The answer names an option the step does not offer.
    #[error("'{option}' is not an option of {key}")]
    UnknownOption { key: String, option: String },

    /// Several options given to a single-choice step.
    #[error("{0} accepts a single option")]
    SingleChoice(String),

    /// `finish` called before the last step was answered.
    #[error("the onboarding is not finished")]
    Incomplete,

    /// Saving the profile failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type OnboardingResult<T> = Result<T, OnboardingError>;

/// What a step asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Pick from a list; `multi` allows several options.
    Choice { options: Vec<String>, multi: bool },
    /// Free text.
    Text,
}

/// A recorded answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

impl Answer {
    /// Every value in the answer.
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(v) => vec![v.as_str()],
            Self::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// Whether the answer picks the "Otro" option.
    pub fn has_other(&self) -> bool {
        self.values().iter().any(|v| v.eq_ignore_ascii_case(OTHER))
    }

    /// Swap the "Otro" pick for the text typed in its detail step.
    fn merge_other(&self, text: &str) -> Answer {
        match self {
            Self::One(_) => Self::One(text.to_string()),
            Self::Many(values) => Self::Many(
                values
                    .iter()
                    .filter(|v| !v.eq_ignore_ascii_case(OTHER))
                    .cloned()
                    .chain(std::iter::once(text.to_string()))
                    .collect(),
            ),
        }
    }

    fn first(&self) -> &str {
        self.values().first().copied().unwrap_or_default()
    }

    fn to_value(&self) -> Value {
        match self {
            Self::One(v) => Value::String(v.clone()),
            Self::Many(vs) => json!(vs),
        }
    }
}

/// What to ask after a step is answered.
#[derive(Debug, Clone, PartialEq)]
enum Next {
    /// A taxonomy question; `branches` maps options to subtrees.
    Taxonomy {
        node: Map<String, Value>,
        branches: Option<Map<String, Value>>,
    },
    /// A free-text "Otro" detail; the walk resumes at `node`.
    Resume(Option<Map<String, Value>>),
    Motivation,
    Headcount,
    Website,
}

/// One question in the walk.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Answer key, e.g. `pregunta_sector`.
    pub key: String,
    /// Text shown to the user.
    pub question: String,
    /// Options or free text.
    pub kind: StepKind,
    /// The validated answer, `None` while pending.
    pub answer: Option<Answer>,
    next: Next,
}

/// Walks the taxonomy and collects answers.
#[derive(Debug, Clone)]
pub struct OnboardingFlow {
    motivations: Vec<String>,
    steps: Vec<Step>,
    finished: bool,
}

impl OnboardingFlow {
    /// Start a walk over `taxonomy`.
    pub fn new(taxonomy: Value) -> OnboardingResult<Self> {
        let Value::Object(mut taxonomy) = taxonomy else {
            return Err(OnboardingError::Taxonomy("root must be an object".into()));
        };
        let tipos = match taxonomy.remove(TIPO_EMPRESA) {
            Some(Value::Object(tipos)) if !tipos.is_empty() => tipos,
            _ => {
                return Err(OnboardingError::Taxonomy(format!(
                    "'{TIPO_EMPRESA}' must be a non-empty object"
                )));
            }
        };
        let motivations = taxonomy
            .get(MOTIVACION_PRINCIPAL)
            .and_then(Value::as_array)
            .map(|items| strings(items))
            .unwrap_or_default();

        let mut root = Map::new();
        root.insert(TIPO_EMPRESA.to_string(), Value::Object(tipos));

        let mut flow = Self {
            motivations,
            steps: Vec::new(),
            finished: false,
        };
        flow.plan_from_node(Some(root));
        Ok(flow)
    }

    /// Read a taxonomy file and start a walk.
    pub async fn load(path: &Path) -> OnboardingResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::new(serde_json::from_str(&raw)?)
    }

    /// Steps asked so far, answered or not.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The unanswered step, if the walk is not finished.
    pub fn current_step(&self) -> Option<&Step> {
        if self.finished {
            return None;
        }
        self.steps.last().filter(|s| s.answer.is_none())
    }

    /// Whether the website step has been answered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the interests step is among the steps.
    pub fn motivacion_asked(&self) -> bool {
        self.has_step(MOTIVACION_PRINCIPAL)
    }

    /// Whether the headcount step is among the steps.
    pub fn extra_info_asked(&self) -> bool {
        self.has_step(NUM_EMPLEADOS)
    }

    /// Answer the current step.
    pub fn answer(&mut self, answer: Answer) -> OnboardingResult<Option<&Step>> {
        let index = self
            .steps
            .iter()
            .rposition(|s| s.answer.is_none())
            .ok_or(OnboardingError::StepOutOfRange(self.steps.len()))?;
        self.answer_step(index, answer)
    }

    /// Answer step `index`, dropping every later step and answer.
    pub fn answer_step(&mut self, index: usize, answer: Answer) -> OnboardingResult<Option<&Step>> {
        let step = self
            .steps
            .get(index)
            .ok_or(OnboardingError::StepOutOfRange(index))?;
        let answer = validate(step, answer)?;

        self.steps.truncate(index + 1);
        self.finished = false;
        debug!(key = %self.steps[index].key, step = index, "Onboarding answer");
        self.steps[index].answer = Some(answer.clone());
        self.plan_next(index, &answer);
        Ok(self.current_step())
    }

    /// Tracker text for step `index`, e.g. `2 de 5`.
    pub fn tracker(&self, index: usize) -> Option<String> {
        let step = self.steps.get(index)?;
        let with_detail = self.has_step(EMPRESA_OTRO_DETALLE);
        let total = if with_detail { 6 } else { 5 };
        Some(format!("{} de {total}", step_number(&step.key, with_detail)))
    }

    /// Every answer keyed by question.
    ///
    /// An "Otro" pick is replaced by the text typed for it, and the detail
    /// step itself is not listed. `empresa_otro_detalle` is the exception
    /// and stays a separate answer.
    pub fn answers(&self) -> BTreeMap<String, Value> {
        self.recorded()
            .into_iter()
            .map(|(key, answer)| (key.to_string(), answer.to_value()))
            .collect()
    }

    /// Build the profile from a finished walk.
    pub fn finish(&self) -> OnboardingResult<OnboardingProfile> {
        if !self.finished {
            return Err(OnboardingError::Incomplete);
        }
        let recorded = self.recorded();
        let answer_of = |key: &str| {
            recorded
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, answer)| answer)
        };
        let mut detail = recorded
            .iter()
            .filter(|(key, _)| !FIXED_KEYS.contains(key))
            .map(|(_, answer)| answer.values().join(", "));

        Ok(OnboardingProfile {
            tipo_empresa: answer_of(TIPO_EMPRESA).map(|a| a.first().to_string()),
            interes: answer_of(MOTIVACION_PRINCIPAL)
                .map(|a| a.values().into_iter().map(String::from).collect())
                .unwrap_or_default(),
            tamano_empresa: answer_of(NUM_EMPLEADOS).map(|a| a.first().to_string()),
            web: answer_of(WEB_EMPRESA).map(|a| a.first().to_string()),
            detalle_empresa: CompanyDetail {
                sector: detail.next(),
                actividad: detail.next(),
            },
            answers: self.answers(),
        })
    }

    /// Save the profile, then request the regulatory profile.
    ///
    /// A failed profile save is logged and does not stop the request.
    pub async fn submit(&self, remote: &dyn RemoteFolderStore) -> OnboardingResult<OnboardingProfile> {
        let profile = self.finish()?;
        if let Err(e) = remote.save_onboarding(&profile).await {
            warn!(error = %e, "Could not save onboarding data");
        }
        let answers = serde_json::to_value(&profile.answers)?;
        remote.regulatory_profile(&answers).await?;
        Ok(profile)
    }

    fn has_step(&self, key: &str) -> bool {
        self.steps.iter().any(|s| s.key == key)
    }

    /// Answered steps in order, with "Otro" details folded into their parent.
    fn recorded(&self) -> Vec<(&str, Answer)> {
        let mut recorded = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            let Some(answer) = &step.answer else {
                continue;
            };
            if is_folded_detail(&step.key) {
                continue;
            }
            let detail = self
                .steps
                .get(index + 1)
                .filter(|next| next.key == detail_key(&step.key))
                .and_then(|next| next.answer.as_ref());
            let answer = match detail {
                Some(text) => answer.merge_other(text.first()),
                None => answer.clone(),
            };
            recorded.push((step.key.as_str(), answer));
        }
        recorded
    }

    fn multi_select(&self, key: &str) -> bool {
        let tipo = self
            .steps
            .first()
            .and_then(|s| s.answer.as_ref())
            .map(Answer::first);
        MULTI_SELECT
            .iter()
            .any(|(t, k)| Some(*t) == tipo && *k == key)
    }

    fn plan_next(&mut self, index: usize, answer: &Answer) {
        let key = self.steps[index].key.clone();
        let next = self.steps[index].next.clone();
        if key == TIPO_EMPRESA && answer.has_other() {
            self.push_text(
                EMPRESA_OTRO_DETALLE,
                "Indícanos a qué se dedica tu empresa",
                Next::Resume(None),
            );
            return;
        }
        let is_choice = matches!(self.steps[index].kind, StepKind::Choice { .. });
        if is_choice && answer.has_other() {
            let then = match next {
                Next::Taxonomy { node, branches } => {
                    Next::Resume(Some(resume_node(&key, node, branches, answer)))
                }
                then => then,
            };
            self.push_text(&detail_key(&key), "Especifica la opción \"Otro\"", then);
            return;
        }
        match next {
            Next::Taxonomy { node, branches } => {
                let resume = resume_node(&key, node, branches, answer);
                self.plan_from_node(Some(resume));
            }
            Next::Resume(node) => self.plan_from_node(node),
            Next::Motivation => self.plan_from_node(None),
            Next::Headcount => self.push_text(
                WEB_EMPRESA,
                "¿Cuál es la página web de tu empresa?",
                Next::Website,
            ),
            Next::Website => self.finished = true,
        }
    }

    fn plan_from_node(&mut self, node: Option<Map<String, Value>>) {
        let node = node.filter(|n| !n.is_empty());
        if let Some(node) = node {
            if let Some((key, options)) = node
                .iter()
                .find_map(|(k, v)| v.as_array().map(|items| (k.clone(), strings(items))))
            {
                let multi = self.multi_select(&key);
                self.push_choice(&key, &title(&key), options, multi, Next::Taxonomy {
                    node,
                    branches: None,
                });
                return;
            }
            if let Some((key, branches)) = node
                .iter()
                .find_map(|(k, v)| v.as_object().map(|b| (k.clone(), b.clone())))
            {
                let options = branches.keys().cloned().collect();
                let question = if key == TIPO_EMPRESA {
                    "¿Qué tipo de empresa eres?".to_string()
                } else {
                    title(&key)
                };
                let multi = self.multi_select(&key);
                self.push_choice(&key, &question, options, multi, Next::Taxonomy {
                    node,
                    branches: Some(branches),
                });
                return;
            }
        }

        if !self.motivacion_asked() {
            let options = self.motivations.clone();
            self.push_choice(
                MOTIVACION_PRINCIPAL,
                "¿Qué te interesa?",
                options,
                true,
                Next::Motivation,
            );
        } else if !self.extra_info_asked() {
            let options = HEADCOUNT_OPTIONS.iter().map(|s| s.to_string()).collect();
            self.push_choice(
                NUM_EMPLEADOS,
                "¿Cuál es el tamaño de tu empresa?",
                options,
                false,
                Next::Headcount,
            );
        } else {
            self.finished = true;
        }
    }

    fn push_choice(&mut self, key: &str, question: &str, options: Vec<String>, multi: bool, next: Next) {
        self.steps.push(Step {
            key: key.to_string(),
            question: question.to_string(),
            kind: StepKind::Choice { options, multi },
            answer: None,
            next,
        });
    }

    fn push_text(&mut self, key: &str, question: &str, next: Next) {
        self.steps.push(Step {
            key: key.to_string(),
            question: question.to_string(),
            kind: StepKind::Text,
            answer: None,
            next,
        });
    }
}

fn detail_key(key: &str) -> String {
    format!("{key}{OTHER_DETAIL_SUFFIX}")
}

fn is_folded_detail(key: &str) -> bool {
    key != EMPRESA_OTRO_DETALLE && key.ends_with(OTHER_DETAIL_SUFFIX)
}

/// Tracker position; an "Otro" detail shares its parent's number.
fn step_number(key: &str, with_detail: bool) -> usize {
    match key {
        TIPO_EMPRESA => 1,
        EMPRESA_OTRO_DETALLE => 2,
        MOTIVACION_PRINCIPAL => 3,
        NUM_EMPLEADOS => 4,
        WEB_EMPRESA => 5,
        _ => match key.strip_suffix(OTHER_DETAIL_SUFFIX) {
            Some(parent) => step_number(parent, with_detail),
            None if with_detail => 3,
            None => 2,
        },
    }
}

/// Node to continue from after answering taxonomy question `key`.
///
/// The chosen branch wins; without one the walk goes on with the rest of
/// `node`.
fn resume_node(
    key: &str,
    mut node: Map<String, Value>,
    branches: Option<Map<String, Value>>,
    answer: &Answer,
) -> Map<String, Value> {
    if let Some(chosen) = branches.and_then(|b| merge_branches(&b, &answer.values())) {
        return chosen;
    }
    node.remove(key);
    node
}

/// Subtree for the chosen options. Several picks merge the option lists of
/// their subtrees into one node, first occurrence first.
fn merge_branches(branches: &Map<String, Value>, chosen: &[&str]) -> Option<Map<String, Value>> {
    let mut subtrees = chosen
        .iter()
        .filter_map(|c| branches.get(*c).and_then(Value::as_object));
    if chosen.len() < 2 {
        return subtrees.next().cloned();
    }
    let mut merged = Map::new();
    for subtree in subtrees {
        for (question, value) in subtree {
            let Some(items) = value.as_array() else {
                continue;
            };
            let entry = merged
                .entry(question.clone())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(options) = entry {
                for item in items {
                    if !options.contains(item) {
                        options.push(item.clone());
                    }
                }
            }
        }
    }
    Some(merged)
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect()
}

/// `pregunta_area_practica` becomes `Area practica`.
fn title(key: &str) -> String {
    let trimmed = key.strip_prefix("pregunta_").unwrap_or(key).replace('_', " ");
    let mut chars = trimmed.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Check an answer against its step and normalize it.
fn validate(step: &Step, answer: Answer) -> OnboardingResult<Answer> {
    match &step.kind {
        StepKind::Text => {
            let text = answer.first().trim().to_string();
            if text.is_empty() {
                return Err(OnboardingError::EmptyAnswer);
            }
            if step.key == WEB_EMPRESA {
                return normalize_web(&text)
                    .map(Answer::One)
                    .ok_or(OnboardingError::EmptyAnswer);
            }
            Ok(Answer::One(text))
        }
        StepKind::Choice { options, multi } => {
            let picked = answer
                .values()
                .into_iter()
                .map(|value| {
                    options
                        .iter()
                        .find(|o| o.eq_ignore_ascii_case(value.trim()))
                        .cloned()
                        .ok_or_else(|| OnboardingError::UnknownOption {
                            key: step.key.clone(),
                            option: value.to_string(),
                        })
                })
                .collect::<OnboardingResult<Vec<_>>>()?;
            match picked.len() {
                0 => Err(OnboardingError::EmptyAnswer),
                _ if *multi => Ok(Answer::Many(picked)),
                1 => Ok(Answer::One(picked.into_iter().next().unwrap_or_default())),
                _ => Err(OnboardingError::SingleChoice(step.key.clone())),
            }
        }
    }
}
