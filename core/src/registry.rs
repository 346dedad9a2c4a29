//! # Registry Mutation-With-Undo Stage
//!
//! Captures the current value+kind at the target path/name as rollback data, then
//! writes the new value. Applying the recorded undo is out of scope; only capture
//! is performed here.

use tracing::warn;

use fleetprobe_common::record::Field;
use fleetprobe_common::registry::RegistryMutation;

use crate::pipeline::{Gate, ProbePipeline};
use crate::session::HostContext;

impl ProbePipeline {
    /// Runs the mutation against one record.
    ///
    /// `Path` and `Name` are caller inputs and recorded unconditionally; the
    /// remote read/write are gated on remote execution. A failed read never
    /// prevents the write attempt, and the captured original stays valid when the
    /// write fails.
    pub async fn mutate_registry(&self, ctx: &mut HostContext, mutation: &RegistryMutation) {
        ctx.record.reg_path = Field::Value(mutation.path.clone());
        ctx.record.reg_name = Field::Value(mutation.name.clone());

        let conn = ctx.record.connectivity;
        if !Gate::RemoteExec.is_open(conn) && !self.config().no_error_check {
            ctx.record.original_kind = Field::NoTry;
            ctx.record.original_value = Field::NoTry;
            ctx.record.reg_result = Field::NoTry;
            return;
        }

        let read = self
            .bounded(self.registry().get_value(
                ctx.exec_target(),
                &mutation.path,
                &mutation.name,
            ))
            .await;
        match read {
            Ok(Some(original)) => {
                ctx.record.original_kind = Field::Value(original.kind().to_string());
                ctx.record.original_value = Field::Value(original.to_string());
            }
            Ok(None) => {
                ctx.record.original_kind = Field::Blank;
                ctx.record.original_value = Field::Value("Not Found".to_string());
            }
            Err(err) => {
                warn!(host = %ctx.record.computer_name, %err, "rollback capture failed");
                ctx.record.original_kind = Field::Blank;
                ctx.record.original_value = Field::Blank;
            }
        }

        let write = self
            .bounded(self.registry().set_value(
                ctx.exec_target(),
                &mutation.path,
                &mutation.name,
                &mutation.value,
            ))
            .await;
        ctx.record.reg_result = match write {
            Ok(()) => Field::Value("Success".to_string()),
            Err(err) => {
                warn!(host = %ctx.record.computer_name, %err, "registry write failed");
                let token = err.to_string();
                Field::Value(if token.is_empty() {
                    "Error".to_string()
                } else {
                    token
                })
            }
        };
    }
}
