use ticli::{validate_arguments, Callable, CommandLine, Parameter, Signature, TypeSpec, Value};

fn main() {
    let jump = validate_arguments(
        Callable::new(
            "jump",
            Signature::new([
                Parameter::positional("height", TypeSpec::Float).help("How high to jump (in feet)."),
                Parameter::positional("verbose", TypeSpec::Bool)
                    .default(false)
                    .help("Enable verbose output."),
            ]),
            |bound| {
                let height: f64 = bound.value("height")?;
                let verbose: bool = bound.value("verbose")?;

                if verbose {
                    println!("getting ready to jump");
                }

                println!("jumping {height} feet");

                if verbose {
                    println!("finished jumping");
                }

                Ok(Value::Null)
            },
        )
        .about("Command the computer to jump for you."),
    );

    CommandLine::new("jump").fire_function(&jump);
}
