use ticli::{
    CommandLine, GroupDefinition, Hook, OptionDeclaration, Outcome, Parameter, TypeSpec,
};

const FEET_PER_METER: f64 = 3.2808399;

fn dialect() -> TypeSpec {
    TypeSpec::literal(["formal", "informal", "hillbilly"])
}

fn main() {
    // Reads `verbose` from the group it's a command of.
    let farewell = GroupDefinition::new("Farewell")
        .about("Farewell command.\n\nCommand the computer to bid you farewell.")
        .option(
            OptionDeclaration::new("dialect", dialect())
                .default("formal")
                .help("Language dialect to use for farewell."),
        )
        .post_call(Hook::new(Vec::<Parameter>::new(), |instance, _| {
            let dialect: String = instance.get_as("dialect")?;
            let verbose: bool = instance.parent_get_as("verbose")?;
            let farewell = match dialect.as_str() {
                "informal" => "Bye!",
                "hillbilly" => "Y'all come back now, ya hear!",
                _ => "Goodbye.",
            };

            if verbose {
                instance.print("getting ready to bid you farewell");
            }

            instance.print(farewell);

            if verbose {
                instance.print("finished bidding you farewell");
            }

            Ok(Outcome::Chain)
        }))
        .build();

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
                [Parameter::positional("dialect", dialect())
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
        .command("farewell", &farewell)
        .build();

    // ex: jump_or_greet_or_farewell --verbose greet - jump 3 - farewell --dialect informal
    CommandLine::new("jump_or_greet_or_farewell").fire_group(&top);
}
