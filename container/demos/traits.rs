use fibre_container::{injectable, resolve, Container};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}
injectable!(ReportService { logger: dyn Logger });

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> fibre_container::Result<()> {
  let container = Container::new();

  // --- Registration ---

  // The logger is stored as `Arc<dyn Logger>` under the identifier "Logger".
  container.instance_arc::<dyn Logger>("Logger", Arc::new(ConsoleLogger))?;

  // ReportService declares its constructor parameter; the container fills it.
  container.singleton_type::<ReportService>()?;

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, ReportService)?;

  println!("Using the service...");
  report_service.generate_report();
  Ok(())
}
