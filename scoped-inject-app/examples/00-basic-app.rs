use scoped_inject::instance::InstancePtr;
use scoped_inject::registry::tag;
use scoped_inject_app::application::Application;
use scoped_inject_app::config::ApplicationConfig;
use scoped_inject_app::runner::{ApplicationRunner, RunnerName, RunnerResult};

struct Greeting {
    text: String,
}

// application logic is a plain function - its parameters are injected from the runner registry
fn greet(greeting: InstancePtr<Greeting>, name: RunnerName) -> RunnerResult {
    println!("{} (from {})", greeting.text, name.0);
    Ok(())
}

// the application config is always available for injection
fn show_config(config: ApplicationConfig) -> RunnerResult {
    println!("Tracing logger installed: {}", config.install_tracing_logger);
    Ok(())
}

// note: for the sake of simplicity, errors are unwrapped, rather than gracefully handled
fn main() {
    let application = Application::create_default()
        .with_runner(ApplicationRunner::new("greeter", greet).expect("error preparing runner"))
        .with_runner(
            ApplicationRunner::new("config", show_config)
                .expect("error preparing runner")
                .with_priority(10),
        );

    // anything registered in the root registry is visible to all runners
    application.registry().register(
        InstancePtr::new(Greeting {
            text: "Hello world!".to_string(),
        }),
        tag::<Greeting>(),
    );

    // prints "Tracing logger installed: true", then "Hello world! (from greeter)"
    application.run().expect("error running application");
}
