use std::fmt;

/// Discriminator carried in every frame's `OpCode` member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    Config,
    Open,
    Close,
    Write,
    Read,
    Error,
}

impl OpCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            OpCode::Config => "config",
            OpCode::Open => "open",
            OpCode::Close => "close",
            OpCode::Write => "write",
            OpCode::Read => "read",
            OpCode::Error => "error",
        }
    }

    /// Map a wire op code to a known one; `None` for anything unrecognized.
    pub fn parse(op_code: &str) -> Option<Self> {
        match op_code {
            "config" => Some(OpCode::Config),
            "open" => Some(OpCode::Open),
            "close" => Some(OpCode::Close),
            "write" => Some(OpCode::Write),
            "read" => Some(OpCode::Read),
            "error" => Some(OpCode::Error),
            _ => None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
