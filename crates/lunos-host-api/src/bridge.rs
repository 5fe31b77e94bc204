//! The capability bridge itself.
//!
//! [`CapabilityBridge`] validates and marshals script arguments, then
//! delegates to the console buffer or the process executor. It owns no
//! state beyond handles to those two capabilities and the granted
//! [`CapabilitySet`].

use crate::capability::{Capability, CapabilitySet};
use crate::error::{BridgeError, BridgeResult};
use crate::render::render_args;
use crate::value::Value;
use lunos_console::{Channel, ConsoleHandle};
use lunos_exec::{CommandSpec, ExecError, Executor};
use std::time::Duration;

/// Binds the console buffer and the process executor to script-callable
/// host functions.
pub struct CapabilityBridge {
    console: ConsoleHandle,
    executor: Executor,
    capabilities: CapabilitySet,
    colored: bool,
}

impl CapabilityBridge {
    /// Bridge over the given capabilities.
    pub fn new(console: ConsoleHandle, executor: Executor, capabilities: CapabilitySet) -> Self {
        Self {
            console,
            executor,
            capabilities,
            colored: false,
        }
    }

    /// Colorize console arguments by value type when rendering.
    pub fn with_colors(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// The console handle this bridge writes through.
    pub fn console(&self) -> &ConsoleHandle {
        &self.console
    }

    fn write_args(&self, channel: Channel, args: &[Value]) {
        self.console
            .write(channel, render_args(args, self.colored));
    }

    /// `console.log(...)` — buffered write on the info channel. Accepts
    /// any values, including none.
    pub fn console_log(&self, args: &[Value]) -> BridgeResult<Value> {
        self.write_args(Channel::Info, args);
        Ok(Value::Undefined)
    }

    /// `console.warn(...)` — buffered write on the warn channel.
    pub fn console_warn(&self, args: &[Value]) -> BridgeResult<Value> {
        self.write_args(Channel::Warn, args);
        Ok(Value::Undefined)
    }

    /// `console.error(...)` — buffered write on the error channel.
    pub fn console_error(&self, args: &[Value]) -> BridgeResult<Value> {
        self.write_args(Channel::Error, args);
        Ok(Value::Undefined)
    }

    /// `console.flush()` — drain the buffer to the sink now.
    pub fn console_flush(&self, args: &[Value]) -> BridgeResult<Value> {
        if !args.is_empty() {
            return Err(BridgeError::invalid_arity(
                "console.flush",
                "no arguments",
                args.len(),
            ));
        }
        self.console.flush();
        Ok(Value::Undefined)
    }

    /// `lunos.shell(program[, command | args][, options])` — run an
    /// external command and report the outcome as a record.
    ///
    /// The returned record has exactly one of two fields populated:
    /// `result` (captured stdout) on success, `error` (`{ kind, message,
    /// exitCode? }`) on failure. On success with separate stderr text a
    /// supplementary `diagnostics` field is added. Execution failure is
    /// never an `Err` here — only malformed arguments or a missing
    /// `process` capability are.
    ///
    /// Argument shapes:
    /// - `shell("ls")` — spawn the program directly, no arguments.
    /// - `shell("ls", ["-l", "/tmp"])` — direct spawn with an argument
    ///   vector; no shell interpretation.
    /// - `shell("sh", "echo hi")` — the named program is used as a shell
    ///   and the string handed to it as `-c <line>`.
    /// - Optional trailing options object: `timeoutMs`, `mergeStderr`,
    ///   `cwd`, `stdin`.
    pub async fn shell(&self, args: &[Value]) -> BridgeResult<Value> {
        if !self.capabilities.has(&Capability::Process) {
            return Err(BridgeError::MissingCapability(
                Capability::Process.to_string(),
            ));
        }
        let spec = parse_shell_args(args)?;
        let record = match self.executor.run(&spec).await {
            Ok(out) => {
                let mut fields = vec![("result", Value::String(out.output))];
                if let Some(diag) = out.diagnostics {
                    fields.push(("diagnostics", Value::String(diag)));
                }
                Value::object(fields)
            }
            Err(err) => Value::object([("error", error_record(&err))]),
        };
        Ok(record)
    }
}

const SHELL_FN: &str = "lunos.shell";

fn parse_shell_args(args: &[Value]) -> BridgeResult<CommandSpec> {
    if args.is_empty() || args.len() > 3 {
        return Err(BridgeError::invalid_arity(
            SHELL_FN,
            "1 to 3 arguments",
            args.len(),
        ));
    }

    let program = args[0]
        .as_str()
        .ok_or_else(|| BridgeError::invalid_argument(SHELL_FN, "a program name string", &args[0]))?;

    let mut spec = match args.get(1) {
        None => CommandSpec::direct(program),
        Some(Value::String(line)) => CommandSpec::shell_with(program, line.clone()),
        Some(Value::Array(items)) => {
            let mut argv = Vec::with_capacity(items.len());
            for item in items {
                let arg = item.as_str().ok_or_else(|| {
                    BridgeError::invalid_argument(SHELL_FN, "an array of strings", item)
                })?;
                argv.push(arg.to_string());
            }
            CommandSpec::direct(program).args(argv)
        }
        Some(other) => {
            return Err(BridgeError::invalid_argument(
                SHELL_FN,
                "a command string or argument array",
                other,
            ))
        }
    };

    if let Some(options) = args.get(2) {
        let fields = match options {
            Value::Object(fields) => fields,
            other => {
                return Err(BridgeError::invalid_argument(
                    SHELL_FN,
                    "an options object",
                    other,
                ))
            }
        };
        for (key, value) in fields {
            match key.as_str() {
                "timeoutMs" => {
                    let ms = value.as_number().filter(|ms| *ms > 0.0).ok_or_else(|| {
                        BridgeError::invalid_argument(SHELL_FN, "timeoutMs: a positive number", value)
                    })?;
                    spec = spec.timeout(Duration::from_millis(ms as u64));
                }
                "mergeStderr" => {
                    let merge = value.as_bool().ok_or_else(|| {
                        BridgeError::invalid_argument(SHELL_FN, "mergeStderr: a boolean", value)
                    })?;
                    spec = spec.merge_stderr(merge);
                }
                "cwd" => {
                    let dir = value.as_str().ok_or_else(|| {
                        BridgeError::invalid_argument(SHELL_FN, "cwd: a string", value)
                    })?;
                    spec = spec.current_dir(dir);
                }
                "stdin" => {
                    let input = value.as_str().ok_or_else(|| {
                        BridgeError::invalid_argument(SHELL_FN, "stdin: a string", value)
                    })?;
                    spec = spec.stdin(input);
                }
                _ => {
                    return Err(BridgeError::InvalidArguments {
                        function: SHELL_FN,
                        expected: "options among timeoutMs, mergeStderr, cwd, stdin",
                        got: format!("unknown option '{key}'"),
                    })
                }
            }
        }
    }

    Ok(spec)
}

/// Marshal an execution failure into the script-visible `error` field.
fn error_record(err: &ExecError) -> Value {
    let mut fields = vec![
        ("kind", Value::from(err.kind().as_str())),
        ("message", Value::from(err.to_string())),
    ];
    if let Some(code) = err.exit_code() {
        fields.push(("exitCode", Value::from(code)));
    }
    Value::object(fields)
}
