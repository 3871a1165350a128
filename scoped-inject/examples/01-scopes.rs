// note: this example assumes you've analyzed the previous one

use scoped_inject::instance::InstancePtr;
use scoped_inject::prepared::prepare;
use scoped_inject::registry::{tag, TypeRegistry};
use std::sync::atomic::{AtomicU32, Ordering};

// state shared between all requests
#[derive(Default)]
struct RequestCounter {
    count: AtomicU32,
}

#[derive(Clone)]
struct RequestPath(String);

fn handle(counter: InstancePtr<RequestCounter>, path: RequestPath, registry: TypeRegistry) {
    let count = counter.count.fetch_add(1, Ordering::SeqCst) + 1;

    // the registry itself can be injected - it's always the nearest one, i.e. the request scope
    let has_parent = registry.parent().is_some();

    println!("request #{} for {} (request scope: {})", count, path.0, has_parent);
}

//noinspection DuplicatedCode
fn main() {
    let handler = prepare(handle).expect("error preparing handler");

    // global registry with singletons
    let global = TypeRegistry::new_root();
    global.register(InstancePtr::<RequestCounter>::default(), tag::<RequestCounter>());

    for path in ["/", "/users", "/users/1"] {
        // each request gets its own child registry, which sees all global values
        let request = global.new_child();
        request.register(RequestPath(path.to_string()), tag::<RequestPath>());

        // prints "request #1 for / (request scope: true)" and so on
        handler
            .invoke(&request)
            .expect("error handling request");
    }

    // request values are not visible in the global scope
    assert!(handler.invoke(&global).is_err());
}
