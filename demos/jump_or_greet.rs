use ticli::{
    CommandLine, GroupDefinition, Hook, OptionDeclaration, Outcome, Parameter, TypeSpec,
};

const FEET_PER_METER: f64 = 3.2808399;

fn main() {
    let top = GroupDefinition::new("Top")
        .about("Multipurpose program.\n\nAllows the user to invoke a subcommand.")
        .option(
            OptionDeclaration::new("verbose", TypeSpec::Bool)
                .default(false)
                .help("Enable verbose output."),
        )
        .method(
            "jump",
            Hook::new(
                [
                    Parameter::positional("height", TypeSpec::Float).help("How high to jump."),
                    Parameter::positional("units", TypeSpec::literal(["feet", "inches", "meters"]))
                        .default("feet")
                        .help("Units for height."),
                ],
                |instance, bound| {
                    let height: f64 = bound.value("height")?;
                    let units: String = bound.value("units")?;
                    let verbose: bool = instance.get_as("verbose")?;
                    let feet = match units.as_str() {
                        "inches" => height / 12.0,
                        "meters" => height * FEET_PER_METER,
                        _ => height,
                    };

                    if verbose {
                        instance.print("getting ready to jump");
                    }

                    instance.print(format!("jumping {feet} feet"));

                    if verbose {
                        instance.print("finished jumping");
                    }

                    Ok(Outcome::Chain)
                },
            )
            .about("Command the computer to jump for you."),
        )
        .method(
            "greet",
            Hook::new(
                [Parameter::positional(
                    "dialect",
                    TypeSpec::literal(["formal", "informal", "hillbilly"]),
                )
                .default("formal")
                .help("Language dialect to use for greeting.")],
                |instance, bound| {
                    let dialect: String = bound.value("dialect")?;
                    let verbose: bool = instance.get_as("verbose")?;
                    let greeting = match dialect.as_str() {
                        "informal" => "Hi!",
                        "hillbilly" => "Howdy, there!",
                        _ => "Hello.",
                    };

                    if verbose {
                        instance.print("getting ready to greet");
                    }

                    instance.print(greeting);

                    if verbose {
                        instance.print("finished greeting");
                    }

                    Ok(Outcome::Chain)
                },
            )
            .about("Command the computer to greet you."),
        )
        .build();

    CommandLine::new("jump_or_greet").fire_group(&top);
}
