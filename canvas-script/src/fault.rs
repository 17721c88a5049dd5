//! Structured script faults and their console rendering.
//!
//! Every interpreter error, parse errors included, becomes a [`ScriptFault`]
//! carrying a stable numeric code, an optional message and help link, the
//! offending source line, and the script call stack.

use rhai::{Dynamic, EvalAltResult, Map, Position};

/// Stable fault codes reported on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum FaultCode {
    /// Source failed to parse.
    Syntax = 0x001,
    /// Reference to an undefined variable.
    VariableNotFound = 0x002,
    /// Call to an undefined function or a wrong signature.
    FunctionNotFound = 0x003,
    /// Access to a missing property.
    PropertyNotFound = 0x004,
    /// Argument or value of the wrong type.
    TypeMismatch = 0x005,
    /// Array or string index out of range.
    IndexOutOfBounds = 0x006,
    /// Arithmetic error such as division by zero.
    Arithmetic = 0x007,
    /// Assignment to a constant.
    ConstantAssignment = 0x008,
    /// Operation limit exceeded.
    TooManyOperations = 0x009,
    /// Call depth limit exceeded.
    StackOverflow = 0x00A,
    /// String or array size limit exceeded.
    DataTooLarge = 0x00B,
    /// Execution terminated by the host.
    Terminated = 0x00C,
    /// Raised by the script with `throw`.
    Thrown = 0x00D,
    /// Host-side system error.
    System = 0x00E,
    /// Anything else.
    Unknown = 0x0FF,
}

impl FaultCode {
    /// Numeric code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Name shown on the console.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Syntax => "Syntax",
            Self::VariableNotFound => "VariableNotFound",
            Self::FunctionNotFound => "FunctionNotFound",
            Self::PropertyNotFound => "PropertyNotFound",
            Self::TypeMismatch => "TypeMismatch",
            Self::IndexOutOfBounds => "IndexOutOfBounds",
            Self::Arithmetic => "Arithmetic",
            Self::ConstantAssignment => "ConstantAssignment",
            Self::TooManyOperations => "TooManyOperations",
            Self::StackOverflow => "StackOverflow",
            Self::DataTooLarge => "DataTooLarge",
            Self::Terminated => "Terminated",
            Self::Thrown => "Thrown",
            Self::System => "System",
            Self::Unknown => "Unknown",
        }
    }

    fn classify(err: &EvalAltResult) -> Self {
        match err {
            EvalAltResult::ErrorParsing(..) => Self::Syntax,
            EvalAltResult::ErrorVariableNotFound(..) => Self::VariableNotFound,
            EvalAltResult::ErrorFunctionNotFound(..) => Self::FunctionNotFound,
            EvalAltResult::ErrorPropertyNotFound(..) => Self::PropertyNotFound,
            EvalAltResult::ErrorMismatchDataType(..)
            | EvalAltResult::ErrorMismatchOutputType(..) => Self::TypeMismatch,
            EvalAltResult::ErrorArrayBounds(..) | EvalAltResult::ErrorStringBounds(..) => {
                Self::IndexOutOfBounds
            }
            EvalAltResult::ErrorArithmetic(..) => Self::Arithmetic,
            EvalAltResult::ErrorAssignmentToConstant(..) => Self::ConstantAssignment,
            EvalAltResult::ErrorTooManyOperations(..) => Self::TooManyOperations,
            EvalAltResult::ErrorStackOverflow(..) => Self::StackOverflow,
            EvalAltResult::ErrorDataTooLarge(..) => Self::DataTooLarge,
            EvalAltResult::ErrorTerminated(..) => Self::Terminated,
            EvalAltResult::ErrorRuntime(..) => Self::Thrown,
            EvalAltResult::ErrorSystem(..) => Self::System,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for FaultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:03X})", self.name(), self.code())
    }
}

/// Where a fault happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, when known.
    pub column: Option<usize>,
    /// The offending source line, trimmed.
    pub text: String,
}

/// One script function call on the stack at fault time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Called function.
    pub function: String,
    /// 1-based line of the call site.
    pub line: Option<usize>,
}

/// A structured interpreter error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFault {
    /// Stable code.
    pub code: FaultCode,
    /// Human-readable description.
    pub message: Option<String>,
    /// Where to read more.
    pub help_link: Option<String>,
    /// Offending line.
    pub location: Option<SourceLocation>,
    /// Script call stack, innermost call first.
    pub stack: Vec<StackFrame>,
}

impl ScriptFault {
    /// Build a fault from an interpreter error raised while running `source`.
    ///
    /// Nested function-call errors are unwound into [`StackFrame`]s; the code,
    /// message and location come from the innermost error.
    #[must_use]
    pub fn from_eval_error(err: EvalAltResult, source: &str) -> Self {
        let mut stack = Vec::new();
        let mut current = err;
        let mut innermost = loop {
            match current {
                EvalAltResult::ErrorInFunctionCall(function, _, inner, pos) => {
                    stack.push(StackFrame {
                        function,
                        line: pos.line(),
                    });
                    current = *inner;
                }
                other => break other,
            }
        };
        stack.reverse();

        let code = FaultCode::classify(&innermost);
        let mut position = innermost.position();
        if position.is_none() {
            // Errors raised by host functions may carry no position of their own.
            position = stack
                .first()
                .and_then(|frame| frame.line)
                .and_then(|line| u16::try_from(line).ok())
                .map_or(Position::NONE, |line| Position::new(line, 0));
        }

        let (message, help_link) = match innermost {
            EvalAltResult::ErrorRuntime(ref value, _) => thrown_details(value),
            ref mut other => {
                other.set_position(Position::NONE);
                (Some(other.to_string()), None)
            }
        };

        Self {
            code,
            message: message.filter(|m| !m.is_empty()),
            help_link,
            location: locate(position, source),
            stack,
        }
    }

    /// Fill in a help link from `base` when the fault has none.
    #[must_use]
    pub fn with_default_help(mut self, base: Option<&str>) -> Self {
        if self.help_link.is_none() {
            self.help_link = base.map(|base| format!("{base}/{:03x}", self.code.code()));
        }
        self
    }

    /// Console lines for this fault, in display order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let code = self.code.code();
        let mut lines = vec![format!(
            "Error : {} {code} (0x{code:03X})",
            self.code.name()
        )];

        if let Some(message) = &self.message {
            lines.push(format!("        {message}"));
        }
        if let Some(link) = &self.help_link {
            lines.push(format!("   See: {link}"));
        }
        lines.push(match &self.location {
            Some(location) => format!("    at: {}  (line {})", location.text, location.line),
            None => "    at: <unknown location>".to_string(),
        });

        if !self.stack.is_empty() {
            lines.push("Stack Trace:".to_string());
            for frame in &self.stack {
                lines.push(match frame.line {
                    Some(line) => format!("  at {} at {line}", frame.function),
                    None => format!("  at {}", frame.function),
                });
            }
        }
        lines
    }
}

impl std::fmt::Display for ScriptFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// `throw "text"` carries a message; `throw #{ message, help }` also a link.
fn thrown_details(value: &Dynamic) -> (Option<String>, Option<String>) {
    if value.is_unit() {
        return (None, None);
    }
    if let Some(map) = value.clone().try_cast::<Map>() {
        let field = |key: &str| {
            map.get(key)
                .filter(|v| !v.is_unit())
                .map(ToString::to_string)
        };
        return (field("message"), field("help"));
    }
    (Some(value.to_string()), None)
}

fn locate(position: Position, source: &str) -> Option<SourceLocation> {
    let line = position.line()?;
    let text = source.lines().nth(line.checked_sub(1)?)?.trim().to_string();
    Some(SourceLocation {
        line,
        column: position.position(),
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "let a = 1;\nlet b = a / 0;\nb";

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(FaultCode::Syntax.code(), 1);
        assert_eq!(FaultCode::StackOverflow.code(), 10);
        assert_eq!(FaultCode::Unknown.code(), 255);
        assert_eq!(FaultCode::TypeMismatch.to_string(), "TypeMismatch (0x005)");
    }

    #[test]
    fn test_arithmetic_fault_lines() {
        let err = EvalAltResult::ErrorArithmetic("Division by zero: 1 / 0".into(), Position::new(2, 11));
        let fault = ScriptFault::from_eval_error(err, SOURCE);

        assert_eq!(fault.code, FaultCode::Arithmetic);
        assert_eq!(
            fault.lines(),
            vec![
                "Error : Arithmetic 7 (0x007)",
                "        Division by zero: 1 / 0",
                "    at: let b = a / 0;  (line 2)",
            ]
        );
    }

    #[test]
    fn test_nested_calls_become_stack_innermost_first() {
        let source = "fn inner() { undefined_var }\nfn outer() { inner() }\nouter();";
        let err = EvalAltResult::ErrorInFunctionCall(
            "outer".into(),
            String::new(),
            Box::new(EvalAltResult::ErrorInFunctionCall(
                "inner".into(),
                String::new(),
                Box::new(EvalAltResult::ErrorVariableNotFound(
                    "undefined_var".into(),
                    Position::new(1, 14),
                )),
                Position::new(2, 14),
            )),
            Position::new(3, 1),
        );
        let fault = ScriptFault::from_eval_error(err, source);
        let lines = fault.lines();

        assert_eq!(fault.code, FaultCode::VariableNotFound);
        assert_eq!(lines[0], "Error : VariableNotFound 2 (0x002)");
        assert!(lines[1].contains("undefined_var"));
        assert!(!lines[1].contains("line 1"));
        assert_eq!(lines[2], "    at: fn inner() { undefined_var }  (line 1)");
        assert_eq!(lines[3], "Stack Trace:");
        assert_eq!(lines[4], "  at inner at 2");
        assert_eq!(lines[5], "  at outer at 3");
    }

    #[test]
    fn test_thrown_map_carries_help_link() {
        let mut map = Map::new();
        map.insert("message".into(), Dynamic::from("custom failure"));
        map.insert("help".into(), Dynamic::from("https://example.com/help"));
        let err = EvalAltResult::ErrorRuntime(Dynamic::from_map(map), Position::new(1, 1));

        let fault = ScriptFault::from_eval_error(err, "throw it;").with_default_help(Some("https://x"));
        assert_eq!(fault.code, FaultCode::Thrown);
        assert_eq!(fault.message.as_deref(), Some("custom failure"));
        assert_eq!(fault.help_link.as_deref(), Some("https://example.com/help"));
        assert_eq!(fault.lines()[2], "   See: https://example.com/help");
    }

    #[test]
    fn test_thrown_string_and_default_help() {
        let err = EvalAltResult::ErrorRuntime(Dynamic::from("boom"), Position::new(1, 1));
        let fault = ScriptFault::from_eval_error(err, "throw \"boom\";")
            .with_default_help(Some("https://docs.example.com/errors"));

        assert_eq!(fault.message.as_deref(), Some("boom"));
        assert_eq!(
            fault.help_link.as_deref(),
            Some("https://docs.example.com/errors/00d")
        );
    }

    #[test]
    fn test_unknown_location() {
        let err = EvalAltResult::ErrorTooManyOperations(Position::NONE);
        let fault = ScriptFault::from_eval_error(err, "loop {}");
        assert_eq!(fault.code, FaultCode::TooManyOperations);
        assert!(fault.location.is_none());
        assert_eq!(fault.lines().last().map(String::as_str), Some("    at: <unknown location>"));
    }
}
