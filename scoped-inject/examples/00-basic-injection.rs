use scoped_inject::injectable;
use scoped_inject::instance::InstancePtr;
use scoped_inject::prepared::prepare;
use scoped_inject::registry::{tag, TypeRegistry};

// interfaces are plain traits marked as injectable - this allows registering values under the
// `dyn Trait` type
#[injectable]
trait TestTrait {
    fn foo(&self) -> String;
}

struct TestDependency;

impl TestTrait for TestDependency {
    fn foo(&self) -> String {
        "foo".to_string()
    }
}

struct Counter {
    start: u32,
}

fn print_all(
    dependency: InstancePtr<dyn TestTrait + Send + Sync>,
    counter: InstancePtr<Counter>,
    name: String,
) {
    println!("{} {} {}", dependency.foo(), counter.start, name);
}

//noinspection DuplicatedCode
fn main() {
    // functions are prepared once, without any registry
    let prepared = prepare(print_all).expect("error preparing function");

    let registry = TypeRegistry::new_root();

    // the value is exposed as InstancePtr<dyn TestTrait + Send + Sync>
    registry.register(TestDependency, tag::<dyn TestTrait + Send + Sync>());

    // pointers are exposed as pointers, so print_all receives the same Counter instance
    registry.register(InstancePtr::new(Counter { start: 1 }), tag::<Counter>());

    // plain values are exposed as values and cloned on injection
    registry.register("basic".to_string(), tag::<String>());

    // prints "foo 1 basic"
    prepared
        .invoke(&registry)
        .expect("error invoking prepared function");
}
