use ticli::{
    CommandLine, GroupDefinition, Hook, Instance, OptionDeclaration, Outcome, Parameter, TypeSpec,
};

fn option_data(instance: &Instance) -> String {
    instance
        .option_data()
        .iter()
        .map(|(name, value)| format!("{name}: {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() {
    let test = GroupDefinition::new("Test")
        .about("Group of options for testing purposes.")
        .option(
            OptionDeclaration::new("a", TypeSpec::Int)
                .default(1)
                .help("first option"),
        )
        .option(
            OptionDeclaration::new("b", TypeSpec::Int)
                .default(2)
                .help("second option"),
        )
        .post_init(Hook::new(
            [
                Parameter::positional("x", TypeSpec::Int)
                    .default(8)
                    .help("first init arg"),
                Parameter::positional("y", TypeSpec::Int)
                    .default(9)
                    .help("second init arg"),
            ],
            |instance, bound| {
                let x: i64 = bound.value("x")?;
                let y: i64 = bound.value("y")?;
                instance.print(format!("  post_init x:{x} y:{y}"));
                instance.print(format!("            option_data: {{{}}}", option_data(instance)));
                Ok(Outcome::Chain)
            },
        ))
        .post_call(Hook::new(
            [Parameter::positional("arg", TypeSpec::Int)
                .default(7)
                .help("first invoke arg")],
            |instance, bound| {
                let arg: i64 = bound.value("arg")?;
                instance.print(format!("  post_call arg:{arg}"));
                instance.print(format!("            option_data: {{{}}}", option_data(instance)));
                Ok(Outcome::Chain)
            },
        ))
        .method(
            "f",
            Hook::new(
                [Parameter::positional("c", TypeSpec::Int).help("input argument for f command")],
                |instance, bound| {
                    let c: i64 = bound.value("c")?;
                    instance.print(format!("f c:{c}"));
                    instance.print(format!("  option_data: {{{}}}", option_data(instance)));
                    Ok(Outcome::Chain)
                },
            )
            .about("Does something mysterious."),
        )
        .method(
            "reset",
            Hook::new(Vec::<Parameter>::new(), |instance, _| {
                instance.print(format!("reset option_data: {{{}}}", option_data(instance)));
                instance.reset();
                Ok(Outcome::Chain)
            })
            .about("Restores option settings to the default values."),
        )
        .build();

    CommandLine::new("init_and_call_args").fire_group(&test);
}
