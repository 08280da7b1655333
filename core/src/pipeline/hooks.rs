// glowcart/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` handlers for pipeline steps.

use crate::error::PipelineError;
use crate::pipeline::control::PipelineControl;
use crate::pipeline::definition::{Handler, Pipeline};
use tracing::{event, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static,
  Err: std::error::Error + From<PipelineError> + 'static,
{
  /// Registers a `before` hook. The handler's own error type only has to
  /// convert into the pipeline's `Err`.
  pub fn before_root<UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(&mut TData) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    UserProvidedErr: Into<Err> + 'static,
  {
    self.ensure_step_exists(step_name)?;
    let handler: Handler<TData, Err> = Box::new(move |data| handler_fn(data).map_err(Into::into));
    self.before.entry(step_name.to_string()).or_default().push(handler);
    event!(Level::TRACE, %step_name, "before handler registered.");
    Ok(())
  }

  /// Registers an `on` hook, the main work of a step.
  pub fn on_root<UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(&mut TData) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    UserProvidedErr: Into<Err> + 'static,
  {
    self.ensure_step_exists(step_name)?;
    let handler: Handler<TData, Err> = Box::new(move |data| handler_fn(data).map_err(Into::into));
    self.on.entry(step_name.to_string()).or_default().push(handler);
    event!(Level::TRACE, %step_name, "on handler registered.");
    Ok(())
  }

  /// Registers an `after` hook.
  pub fn after_root<UserProvidedErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(&mut TData) -> Result<PipelineControl, UserProvidedErr> + Send + Sync + 'static,
  ) -> Result<(), PipelineError>
  where
    UserProvidedErr: Into<Err> + 'static,
  {
    self.ensure_step_exists(step_name)?;
    let handler: Handler<TData, Err> = Box::new(move |data| handler_fn(data).map_err(Into::into));
    self.after.entry(step_name.to_string()).or_default().push(handler);
    event!(Level::TRACE, %step_name, "after handler registered.");
    Ok(())
  }
}
