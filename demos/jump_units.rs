use ticli::{validate_arguments, Callable, CommandLine, Parameter, Signature, TypeSpec, Value};

const FEET_PER_METER: f64 = 3.2808399;

fn main() {
    let jump = validate_arguments(
        Callable::new(
            "jump",
            Signature::new([
                Parameter::positional("height", TypeSpec::Float).help("How high to jump."),
                Parameter::positional("verbose", TypeSpec::Bool)
                    .default(false)
                    .help("Enable verbose output."),
                Parameter::positional("units", TypeSpec::literal(["feet", "inches", "meters"]))
                    .default("feet")
                    .help("Units for height."),
            ]),
            |bound| {
                let height: f64 = bound.value("height")?;
                let verbose: bool = bound.value("verbose")?;
                let units: String = bound.value("units")?;
                let feet = match units.as_str() {
                    "inches" => height / 12.0,
                    "meters" => height * FEET_PER_METER,
                    _ => height,
                };

                if verbose {
                    println!("getting ready to jump");
                }

                println!("jumping {feet} feet");

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
