use filter_core::Value;

/// Accumulates SQL text and bind arguments for one lowering pass.
///
/// `args_offset` is the number of parameters the surrounding statement has
/// already bound, so numbered placeholders continue after them.
#[derive(Debug, Clone, Default)]
pub struct ConvertContext {
    pub buffer: String,
    pub args: Vec<Value>,
    pub args_offset: usize,
}

impl ConvertContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(args_offset: usize) -> Self {
        Self {
            args_offset,
            ..Self::default()
        }
    }

    /// Zero-based index the next emitted placeholder will receive.
    pub fn next_index(&self) -> usize {
        self.args_offset + self.args.len()
    }

    pub fn sql(&self) -> &str {
        &self.buffer
    }

    /// Consumes the context and returns the SQL text and its arguments.
    pub fn finish(self) -> SqlFragment {
        SqlFragment {
            sql: self.buffer,
            args: self.args,
        }
    }
}

/// A rendered predicate ready to splice into a `WHERE` clause.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlFragment {
    pub sql: String,
    pub args: Vec<Value>,
}

impl SqlFragment {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}
