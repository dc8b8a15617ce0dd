mod server;

pub use server::NutriflowService;
