// glowcart/src/pipeline/execution.rs

//! `Pipeline::run()`, which walks the steps in order and executes their handlers.

use crate::error::PipelineError;
use crate::pipeline::control::{PipelineControl, PipelineResult};
use crate::pipeline::definition::{Handler, Pipeline};
use tracing::{event, instrument, span, Level};

enum PhaseOutcome<Err> {
  Continue,
  Stopped,
  Failed(Err),
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static,
  Err: std::error::Error + From<PipelineError> + 'static,
{
  /// Executes the pipeline against `data`.
  ///
  /// A non-optional step without any handler fails the run with
  /// `PipelineError::HandlerMissing`, converted into `Err`. The first handler
  /// error aborts the run and is returned as-is.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      pipeline_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub fn run(&self, data: &mut TData) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );
      let _step_span_guard = step_span.enter();

      if let Some(skip_cond_fn) = &step_def.skip_if {
        if skip_cond_fn(data) {
          event!(Level::DEBUG, "Step skipped due to 'skip_if' condition.");
          continue;
        }
      }

      let has_handlers = [&self.before, &self.on, &self.after]
        .iter()
        .any(|phase| phase.get(step_name).is_some_and(|v| !v.is_empty()));

      if !has_handlers {
        if step_def.optional {
          event!(Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, "Non-optional step has no handlers.");
        return Err(Err::from(PipelineError::HandlerMissing {
          step_name: step_def.name.clone(),
        }));
      }

      for (phase_name, phase) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
        match Self::run_phase(phase_name, phase.get(step_name), data) {
          PhaseOutcome::Continue => {}
          PhaseOutcome::Stopped => {
            event!(Level::INFO, phase = phase_name, "Pipeline stopped by a handler.");
            return Ok(PipelineResult::Stopped);
          }
          PhaseOutcome::Failed(e) => {
            event!(Level::WARN, phase = phase_name, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
      event!(Level::DEBUG, "Step finished.");
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  fn run_phase(
    phase_name: &'static str,
    handlers: Option<&Vec<Handler<TData, Err>>>,
    data: &mut TData,
  ) -> PhaseOutcome<Err> {
    let Some(handlers) = handlers else {
      return PhaseOutcome::Continue;
    };
    for (handler_idx, handler_fn) in handlers.iter().enumerate() {
      let handler_span = span!(Level::DEBUG, "handler", phase = phase_name, handler_index = handler_idx);
      let _handler_span_guard = handler_span.enter();
      match handler_fn(data) {
        Ok(PipelineControl::Continue) => {}
        Ok(PipelineControl::Stop) => return PhaseOutcome::Stopped,
        Err(e) => return PhaseOutcome::Failed(e),
      }
    }
    PhaseOutcome::Continue
  }
}
