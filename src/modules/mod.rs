pub mod book;

use estante_kernel::ModuleRegistry;

/// Register all application modules with the registry.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(book::create_module());
}
