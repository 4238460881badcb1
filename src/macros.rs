//! Declarative sugar for series definition.
//!
//! `stepwise!` expands to a [`crate::stepwise`] call with one builder method
//! per declaration, keeping a series readable at a glance.

/// Declare a series of steps against a runtime.
///
/// Declarations are `step "name" => body`, `on_fail => body` and
/// `after => body`, separated by semicolons, in the order they should run.
///
/// # Example
///
/// ```
/// use stepwise::Harness;
///
/// #[derive(Default)]
/// struct Cart {
///     items: u32,
/// }
///
/// let mut harness = Harness::<String>::new();
/// stepwise::stepwise!(&mut harness, "checkout", Cart::default, {
///     step "add item" => |ctx| {
///         ctx.items += 1;
///         Ok(())
///     };
///     step "pay" => |ctx| {
///         if ctx.items == 0 {
///             return Err("empty cart".to_string());
///         }
///         Ok(())
///     };
///     after => |ctx| {
///         ctx.items = 0;
///         Ok(())
///     };
/// });
/// assert!(harness.run().is_success());
/// ```
#[macro_export]
macro_rules! stepwise {
    ($runtime:expr, $name:expr, $factory:expr, { $($decls:tt)* }) => {
        $crate::stepwise($runtime, $name, $factory, |series| {
            $crate::stepwise!(@decl series, $($decls)*);
        })
    };

    (@decl $series:ident,) => {};

    (@decl $series:ident, step $step_name:literal => $body:expr ; $($rest:tt)*) => {
        $series.step($step_name, $body);
        $crate::stepwise!(@decl $series, $($rest)*);
    };

    (@decl $series:ident, on_fail => $body:expr ; $($rest:tt)*) => {
        $series.on_fail($body);
        $crate::stepwise!(@decl $series, $($rest)*);
    };

    (@decl $series:ident, after => $body:expr ; $($rest:tt)*) => {
        $series.after($body);
        $crate::stepwise!(@decl $series, $($rest)*);
    };
}
