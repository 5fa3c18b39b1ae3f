pub mod trending;
pub mod users;

use shelfwise_kernel::ModuleRegistry;

use crate::AppContext;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, ctx: &AppContext) -> anyhow::Result<()> {
    registry.register(trending::create_module(ctx))?;
    registry.register(users::create_module(ctx))?;
    Ok(())
}
