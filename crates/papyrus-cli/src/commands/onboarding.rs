//! Interactive company onboarding.

use std::path::Path;

use clap::Args;
use dialoguer::{Input, MultiSelect, Select};

use papyrus_client::onboarding::{Answer, OnboardingError, OnboardingFlow, Step, StepKind};
use papyrus_core::error::{AppError, ErrorKind};

use super::Session;
use crate::output::{self, OutputFormat};

/// Arguments for the onboarding command
#[derive(Debug, Args)]
pub struct OnboardingArgs {
    /// Taxonomy JSON file
    #[arg(short, long, default_value = "config/onboarding.json")]
    pub taxonomy: String,

    /// Print the profile without sending it
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute the onboarding command
pub async fn execute(args: &OnboardingArgs, session: &Session<'_>) -> Result<(), AppError> {
    let mut flow = OnboardingFlow::load(Path::new(&args.taxonomy))
        .await
        .map_err(into_app_error)?;

    while let Some(step) = flow.current_step().cloned() {
        let tracker = flow
            .tracker(flow.steps().len() - 1)
            .unwrap_or_default();
        let answer = prompt(&step, &format!("[{tracker}] {}", step.question))?;
        if let Err(e) = flow.answer(answer) {
            output::print_warning(&e.to_string());
        }
    }

    let profile = if args.dry_run {
        flow.finish()
    } else {
        let (_, remote) = session.remote()?;
        flow.submit(remote.as_ref()).await
    }
    .map_err(into_app_error)?;

    match session.format {
        OutputFormat::Json => output::print_json(&profile),
        OutputFormat::Table => {
            if !args.dry_run {
                output::print_success("Perfil guardado");
            }
            output::print_kv("Tipo de empresa", profile.tipo_empresa.as_deref().unwrap_or("-"));
            output::print_kv(
                "Sector",
                profile.detalle_empresa.sector.as_deref().unwrap_or("-"),
            );
            output::print_kv(
                "Actividad",
                profile.detalle_empresa.actividad.as_deref().unwrap_or("-"),
            );
            output::print_kv("Intereses", &profile.interes.join(", "));
            output::print_kv("Tamaño", profile.tamano_empresa.as_deref().unwrap_or("-"));
            output::print_kv("Web", profile.web.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}

fn prompt(step: &Step, text: &str) -> Result<Answer, AppError> {
    let prompt_error = |e: dialoguer::Error| AppError::internal(format!("Input error: {e}"));
    match &step.kind {
        StepKind::Text => {
            let value: String = Input::new()
                .with_prompt(text)
                .interact_text()
                .map_err(prompt_error)?;
            Ok(Answer::One(value))
        }
        StepKind::Choice { options, multi: true } => {
            let picked = MultiSelect::new()
                .with_prompt(text)
                .items(options)
                .interact()
                .map_err(prompt_error)?;
            Ok(Answer::Many(
                picked.into_iter().map(|i| options[i].clone()).collect(),
            ))
        }
        StepKind::Choice { options, multi: false } => {
            let picked = Select::new()
                .with_prompt(text)
                .items(options)
                .default(0)
                .interact()
                .map_err(prompt_error)?;
            Ok(Answer::One(options[picked].clone()))
        }
    }
}

fn into_app_error(err: OnboardingError) -> AppError {
    let kind = match &err {
        OnboardingError::Taxonomy(_) | OnboardingError::Io(_) | OnboardingError::Parse(_) => {
            ErrorKind::Configuration
        }
        OnboardingError::Remote(_) => ErrorKind::ServiceUnavailable,
        _ => ErrorKind::Validation,
    };
    AppError::new(kind, err.to_string())
}
