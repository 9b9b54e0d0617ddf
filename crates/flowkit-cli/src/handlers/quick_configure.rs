//! Quick-configure command handler

use super::utils::{load_document, read_text, save_output};
use crate::cli::QuickConfigureArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use flowkit_core::{inject_quick_configure_fields, Workflow, WorkflowType};

pub fn handle_quick_configure(
    args: QuickConfigureArgs,
    _config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("quick_configure", &args.workflow.display().to_string());

    let workflow = Workflow::from_str_checked(&read_text(&args.workflow)?)?;
    let model_interface = args.model_interface.as_deref().map(load_document).transpose()?;
    let fields = args.fields();

    match workflow.workflow_type() {
        Some(workflow_type @ (WorkflowType::Custom | WorkflowType::SentimentAnalysis)) => {
            output.warning(&format!(
                "{} workflows are not changed by quick configure",
                workflow_type
            ))?;
        }
        Some(WorkflowType::Unknown(name)) => {
            output.warning(&format!("Unknown workflow type '{}'; workflow is unchanged", name))?;
        }
        Some(workflow_type) => {
            output.info(&format!("Configuring {} workflow '{}'", workflow_type, workflow.name))?;
        }
        None => {}
    }
    if fields.is_empty() {
        output.warning("No quick-configure fields given; workflow is unchanged")?;
    }
    if model_interface.is_none() && fields.model_id().is_some() {
        output.info("No model interface given; map keys are left empty")?;
    }

    let updated = inject_quick_configure_fields(&workflow, &fields, model_interface.as_ref());

    match args.save_to {
        Some(path) => {
            save_output(&path, &updated, output.format())?;
            output.success(&format!("✓ Workflow saved to {}", path.display()))
        }
        None => output.data(&updated),
    }
}
