use crate::{
    context::{ConvertContext, SqlFragment},
    dialect::Dialect,
    error::LowerError,
    render::{Render, Renderer},
};
use filter_core::Condition;
use tracing::{debug, trace};

/// Lowers conditions into SQL for one dialect.
///
/// The converter holds no state of its own, so one instance can lower any
/// number of conditions, including the same condition several times.
#[derive(Clone, Copy)]
pub struct SqlConverter<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> SqlConverter<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> &'a dyn Dialect {
        self.dialect
    }

    /// Appends the SQL for `condition` to `ctx`.
    ///
    /// On error `ctx` is left exactly as it was before the call.
    pub fn convert(&self, ctx: &mut ConvertContext, condition: &Condition) -> Result<(), LowerError> {
        let (sql_len, args_len) = (ctx.buffer.len(), ctx.args.len());

        let result = condition.render(&mut Renderer::new(ctx, self.dialect));
        if let Err(error) = result {
            ctx.buffer.truncate(sql_len);
            ctx.args.truncate(args_len);
            debug!(%error, dialect = %self.dialect.name(), "condition not lowered");
            return Err(error);
        }

        trace!(
            sql = &ctx.buffer[sql_len..],
            args = ctx.args.len() - args_len,
            dialect = %self.dialect.name(),
            "condition lowered"
        );
        Ok(())
    }

    /// Lowers `condition` into a fresh fragment whose placeholders start
    /// after `args_offset` already-bound parameters.
    pub fn lower(&self, condition: &Condition, args_offset: usize) -> Result<SqlFragment, LowerError> {
        let mut ctx = ConvertContext::with_offset(args_offset);
        self.convert(&mut ctx, condition)?;
        Ok(ctx.finish())
    }
}
