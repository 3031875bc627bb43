#[macro_export]
macro_rules! do_internal(
    ($func:ident) => {
        Box::new(|model: &mut $crate::model::Model<'_>| -> winsys::Result<()> {
            Ok(model.$func()?)
        }) as $crate::binding::KeyAction
    };

    ($func:ident, $($arg:expr),+) => {
        Box::new(move |model: &mut $crate::model::Model<'_>| -> winsys::Result<()> {
            Ok(model.$func($($arg),+)?)
        }) as $crate::binding::KeyAction
    };
);

#[macro_export]
macro_rules! spawn_external(
    ($cmd:expr) => {
        {
            Box::new(move |_: &mut $crate::model::Model<'_>| -> winsys::Result<()> {
                $crate::util::Util::spawn($cmd);
                Ok(())
            }) as $crate::binding::KeyAction
        }
    };
);

#[macro_export]
macro_rules! build_key_bindings(
    { @start $key_bindings:expr,
        $( $binding:expr ),+ => $action:expr,
        $($tail:tt)*
    } => {
        $(
            match $crate::util::Util::parse_key_binding($binding) {
                None => panic!("could not parse key binding: {}", $binding),
                Some(input) => $key_bindings.insert(input, $action),
            };
        )+
        build_key_bindings!(@start $key_bindings, $($tail)*);
    };

    { @start $key_bindings:expr,
        $($tail:tt)*
    } => {
        $(compile_error!(
            stringify!(incorrect syntax in build_key_bindings: $tail)
        );)*
    };

    { $($tokens:tt)+ } => {
        {
            let mut key_bindings = $crate::binding::KeyBindings::new();
            build_key_bindings!(@start key_bindings, $($tokens)+);
            key_bindings
        }
    };
);
