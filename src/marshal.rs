//! Call descriptors and the argument marshaling engine.
//!
//! Every native entry point is described by one [`CallDesc`]: symbol name,
//! return tag, and an ordered parameter list. Binding resolves the symbol
//! exactly once and fixes the call shape; every invocation then runs through
//! a single validating path that checks arity, converts each argument with a
//! fixed per-type rule, and only then touches native code. This keeps the
//! 170-odd SDK entry points maintainable as data instead of hand-written
//! stubs.

use std::ffi::c_void;
use std::mem::transmute;
use std::ptr::NonNull;

use crate::error::{Error, Result};
use crate::native::SymbolSource;

/// Declared parameter type of a native call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    I32,
    U32,
    F32,
    /// Pointer-sized value: opaque handles, out-pointers for handles.
    Ptr,
    /// A native struct described in the schema registry.
    Struct,
}

/// Whether a parameter is passed by value or through a caller-owned cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassBy {
    Value,
    Ref,
}

/// One parameter of a call descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub tag: TypeTag,
    pub pass: PassBy,
}

/// Return tag. Every FlyCapture2 entry point returns an `fc2Error` status;
/// `Void` exists for symbol tables that include true void functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetTag {
    Status,
    Void,
}

/// Descriptor of one native entry point.
#[derive(Debug, Clone, Copy)]
pub struct CallDesc {
    pub symbol: &'static str,
    pub ret: RetTag,
    pub params: &'static [Param],
}

/// An argument supplied to [`BoundFn::invoke`].
///
/// By-value arguments carry widened scalars that are narrowed (with a
/// representability check) to the declared parameter width. By-reference
/// arguments must be caller-owned cells: handing a plain value to a
/// by-reference parameter is rejected as [`Error::NotAddressable`], because
/// the native side's writes to the temporary would be silently lost.
pub enum Arg<'a> {
    Int(i64),
    Float(f64),
    Ptr(*mut c_void),
    OutI32(&'a mut i32),
    OutU32(&'a mut u32),
    OutF32(&'a mut f32),
    OutPtr(&'a mut *mut c_void),
    /// Pointer to a caller-owned `#[repr(C)]` struct.
    StructRef(*mut c_void),
}

impl std::fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arg::Int(v) => write!(f, "Int({})", v),
            Arg::Float(v) => write!(f, "Float({})", v),
            Arg::Ptr(p) => write!(f, "Ptr({:p})", p),
            Arg::OutI32(_) => write!(f, "OutI32"),
            Arg::OutU32(_) => write!(f, "OutU32"),
            Arg::OutF32(_) => write!(f, "OutF32"),
            Arg::OutPtr(_) => write!(f, "OutPtr"),
            Arg::StructRef(p) => write!(f, "StructRef({:p})", p),
        }
    }
}

/// Marshaled form of one argument.
enum RawArg {
    Word(usize),
    Float(f32),
}

/// The raw ABI shape of a call: how many machine words, and whether a single
/// trailing `f32` is passed by value. This closed set covers the whole
/// FlyCapture2 C surface; descriptors outside it are rejected at bind time.
#[derive(Debug, Clone, Copy)]
struct Shape {
    words: usize,
    trailing_float: bool,
}

const MAX_WORDS: usize = 6;

fn compute_shape(desc: &CallDesc) -> Result<Shape> {
    let mut words = 0;
    let mut trailing_float = false;
    for (i, param) in desc.params.iter().enumerate() {
        match (param.pass, param.tag) {
            (PassBy::Value, TypeTag::F32) => {
                // Floats ride in different registers than words; only the
                // single-trailing-float form used by the SDK is dispatched.
                if i + 1 != desc.params.len() {
                    return Err(Error::UnsupportedSignature { call: desc.symbol });
                }
                trailing_float = true;
            }
            (PassBy::Value, TypeTag::Struct) => {
                return Err(Error::UnsupportedSignature { call: desc.symbol });
            }
            _ => words += 1,
        }
    }
    // The trailing float takes one of the dispatch slots.
    if words + usize::from(trailing_float) > MAX_WORDS {
        return Err(Error::UnsupportedSignature { call: desc.symbol });
    }
    Ok(Shape {
        words,
        trailing_float,
    })
}

/// A call descriptor bound to a resolved native symbol.
pub struct BoundFn {
    desc: CallDesc,
    fnptr: NonNull<c_void>,
    shape: Shape,
}

// The function address stays valid for the lifetime of the symbol source,
// which the owning Fc2Api keeps alive.
unsafe impl Send for BoundFn {}
unsafe impl Sync for BoundFn {}

impl std::fmt::Debug for BoundFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundFn")
            .field("symbol", &self.desc.symbol)
            .field("params", &self.desc.params.len())
            .finish()
    }
}

impl CallDesc {
    /// Resolves the symbol in the given source and fixes the call shape.
    /// Binding happens once; the argument count and order are immutable for
    /// the lifetime of the returned function.
    pub fn bind(&self, source: &dyn SymbolSource) -> Result<BoundFn> {
        let shape = compute_shape(self)?;
        let fnptr = source
            .resolve(self.symbol)
            .ok_or_else(|| Error::SymbolNotFound {
                symbol: self.symbol.to_string(),
            })?;
        Ok(BoundFn {
            desc: *self,
            fnptr,
            shape,
        })
    }
}

impl BoundFn {
    pub fn symbol(&self) -> &'static str {
        self.desc.symbol
    }

    /// Validates and marshals `args`, invokes the native symbol, and returns
    /// its raw status unchanged. A wrong argument count or an inconvertible
    /// argument fails before any native code runs.
    pub fn invoke(&self, args: &mut [Arg<'_>]) -> Result<i32> {
        if args.len() != self.desc.params.len() {
            return Err(Error::ArityMismatch {
                call: self.desc.symbol,
                expected: self.desc.params.len(),
                got: args.len(),
            });
        }
        let mut words = [0usize; MAX_WORDS];
        let mut nwords = 0;
        let mut tail = None;
        for (param, arg) in self.desc.params.iter().zip(args.iter_mut()) {
            match convert(self.desc.symbol, param, arg)? {
                RawArg::Word(w) => {
                    words[nwords] = w;
                    nwords += 1;
                }
                RawArg::Float(f) => tail = Some(f),
            }
        }
        debug_assert_eq!(nwords, self.shape.words);
        // Safety: the descriptor table declares the exact signature of the
        // resolved symbol, and the shape was checked against the closed
        // dispatch set at bind time.
        let status = unsafe {
            match (self.desc.ret, tail) {
                (RetTag::Status, None) => call_words(self.fnptr, &words[..nwords]),
                (RetTag::Status, Some(f)) => call_words_float(self.fnptr, &words[..nwords], f),
                (RetTag::Void, None) => {
                    call_void(self.fnptr, &words[..nwords]);
                    0
                }
                (RetTag::Void, Some(_)) => {
                    return Err(Error::UnsupportedSignature {
                        call: self.desc.symbol,
                    })
                }
            }
        };
        Ok(status)
    }
}

/// The fixed conversion table, selected by the parameter's pass mode and
/// declared type.
fn convert(call: &'static str, param: &Param, arg: &mut Arg<'_>) -> Result<RawArg> {
    let invalid = |detail: String| Error::InvalidValue {
        call,
        param: param.name,
        detail,
    };
    match (param.pass, param.tag) {
        (PassBy::Value, TypeTag::I32) => match arg {
            Arg::Int(v) => i32::try_from(*v)
                .map(|v| RawArg::Word(v as u32 as usize))
                .map_err(|_| invalid(format!("{} out of range for i32", v))),
            other => Err(invalid(format!("expected integer, got {:?}", other))),
        },
        (PassBy::Value, TypeTag::U32) => match arg {
            Arg::Int(v) => u32::try_from(*v)
                .map(|v| RawArg::Word(v as usize))
                .map_err(|_| invalid(format!("{} out of range for u32", v))),
            other => Err(invalid(format!("expected integer, got {:?}", other))),
        },
        (PassBy::Value, TypeTag::F32) => match arg {
            Arg::Float(v) => {
                let narrowed = *v as f32;
                // A finite f64 narrowing to infinity is out of range.
                if v.is_finite() && !narrowed.is_finite() {
                    return Err(invalid(format!("{} out of range for f32", v)));
                }
                Ok(RawArg::Float(narrowed))
            }
            Arg::Int(v) => Ok(RawArg::Float(*v as f32)),
            other => Err(invalid(format!("expected float, got {:?}", other))),
        },
        (PassBy::Value, TypeTag::Ptr) => match arg {
            Arg::Ptr(p) => Ok(RawArg::Word(*p as usize)),
            other => Err(invalid(format!("expected pointer, got {:?}", other))),
        },
        // Rejected at bind time already.
        (PassBy::Value, TypeTag::Struct) => Err(Error::UnsupportedSignature { call }),
        (PassBy::Ref, tag) => match (tag, arg) {
            (TypeTag::I32, Arg::OutI32(cell)) => Ok(RawArg::Word(&mut **cell as *mut i32 as usize)),
            (TypeTag::U32, Arg::OutU32(cell)) => Ok(RawArg::Word(&mut **cell as *mut u32 as usize)),
            (TypeTag::F32, Arg::OutF32(cell)) => Ok(RawArg::Word(&mut **cell as *mut f32 as usize)),
            (TypeTag::Ptr, Arg::OutPtr(cell)) => {
                Ok(RawArg::Word(&mut **cell as *mut *mut c_void as usize))
            }
            (TypeTag::Struct, Arg::StructRef(p)) => Ok(RawArg::Word(*p as usize)),
            (_, Arg::Int(_) | Arg::Float(_) | Arg::Ptr(_)) => Err(Error::NotAddressable {
                call,
                param: param.name,
            }),
            (_, other) => Err(invalid(format!("wrong cell type, got {:?}", other))),
        },
    }
}

unsafe fn call_words(p: NonNull<c_void>, w: &[usize]) -> i32 {
    let p = p.as_ptr();
    unsafe { match *w {
        [] => transmute::<*mut c_void, unsafe extern "C" fn() -> i32>(p)(),
        [a] => transmute::<*mut c_void, unsafe extern "C" fn(usize) -> i32>(p)(a),
        [a, b] => transmute::<*mut c_void, unsafe extern "C" fn(usize, usize) -> i32>(p)(a, b),
        [a, b, c] => {
            transmute::<*mut c_void, unsafe extern "C" fn(usize, usize, usize) -> i32>(p)(a, b, c)
        }
        [a, b, c, d] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize) -> i32,
        >(p)(a, b, c, d),
        [a, b, c, d, e] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize, usize) -> i32,
        >(p)(a, b, c, d, e),
        [a, b, c, d, e, g] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize, usize, usize) -> i32,
        >(p)(a, b, c, d, e, g),
        _ => unreachable!("shape checked at bind time"),
    } }
}

unsafe fn call_words_float(p: NonNull<c_void>, w: &[usize], f: f32) -> i32 {
    let p = p.as_ptr();
    unsafe { match *w {
        [] => transmute::<*mut c_void, unsafe extern "C" fn(f32) -> i32>(p)(f),
        [a] => transmute::<*mut c_void, unsafe extern "C" fn(usize, f32) -> i32>(p)(a, f),
        [a, b] => {
            transmute::<*mut c_void, unsafe extern "C" fn(usize, usize, f32) -> i32>(p)(a, b, f)
        }
        [a, b, c] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, f32) -> i32,
        >(p)(a, b, c, f),
        [a, b, c, d] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize, f32) -> i32,
        >(p)(a, b, c, d, f),
        [a, b, c, d, e] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize, usize, f32) -> i32,
        >(p)(a, b, c, d, e, f),
        _ => unreachable!("shape checked at bind time"),
    } }
}

unsafe fn call_void(p: NonNull<c_void>, w: &[usize]) {
    let p = p.as_ptr();
    unsafe { match *w {
        [] => transmute::<*mut c_void, unsafe extern "C" fn()>(p)(),
        [a] => transmute::<*mut c_void, unsafe extern "C" fn(usize)>(p)(a),
        [a, b] => transmute::<*mut c_void, unsafe extern "C" fn(usize, usize)>(p)(a, b),
        [a, b, c] => transmute::<*mut c_void, unsafe extern "C" fn(usize, usize, usize)>(p)(a, b, c),
        [a, b, c, d] => {
            transmute::<*mut c_void, unsafe extern "C" fn(usize, usize, usize, usize)>(p)(a, b, c, d)
        }
        [a, b, c, d, e] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize, usize),
        >(p)(a, b, c, d, e),
        [a, b, c, d, e, g] => transmute::<
            *mut c_void,
            unsafe extern "C" fn(usize, usize, usize, usize, usize, usize),
        >(p)(a, b, c, d, e, g),
        _ => unreachable!("shape checked at bind time"),
    } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FnTable(HashMap<&'static str, usize>);

    impl SymbolSource for FnTable {
        fn resolve(&self, symbol: &str) -> Option<NonNull<c_void>> {
            self.0
                .get(symbol)
                .and_then(|&addr| NonNull::new(addr as *mut c_void))
        }
    }

    unsafe extern "C" fn add_one(a: u32, out: *mut u32) -> i32 {
        unsafe { *out = a + 1 };
        0
    }

    static GUARDED_CALLS: AtomicUsize = AtomicUsize::new(0);

    unsafe extern "C" fn guarded(a: u32, out: *mut u32) -> i32 {
        GUARDED_CALLS.fetch_add(1, Ordering::SeqCst);
        unsafe { *out = a };
        0
    }

    unsafe extern "C" fn scale(out: *mut f32, factor: f32) -> i32 {
        unsafe { *out *= factor };
        0
    }

    unsafe extern "C" fn always_timeout() -> i32 {
        18 // FC2_ERROR_TIMEOUT
    }

    const TWO_ARGS: &[Param] = &[
        Param {
            name: "a",
            tag: TypeTag::U32,
            pass: PassBy::Value,
        },
        Param {
            name: "out",
            tag: TypeTag::U32,
            pass: PassBy::Ref,
        },
    ];

    fn table() -> FnTable {
        let mut map = HashMap::new();
        map.insert(
            "add_one",
            add_one as unsafe extern "C" fn(u32, *mut u32) -> i32 as usize,
        );
        map.insert(
            "guarded",
            guarded as unsafe extern "C" fn(u32, *mut u32) -> i32 as usize,
        );
        map.insert(
            "scale",
            scale as unsafe extern "C" fn(*mut f32, f32) -> i32 as usize,
        );
        map.insert(
            "always_timeout",
            always_timeout as unsafe extern "C" fn() -> i32 as usize,
        );
        FnTable(map)
    }

    #[test]
    fn bind_and_invoke_round_trips_out_params() {
        let desc = CallDesc {
            symbol: "add_one",
            ret: RetTag::Status,
            params: TWO_ARGS,
        };
        let bound = desc.bind(&table()).unwrap();
        let mut out = 0u32;
        let status = bound
            .invoke(&mut [Arg::Int(41), Arg::OutU32(&mut out)])
            .unwrap();
        assert_eq!(status, 0);
        assert_eq!(out, 42);
    }

    #[test]
    fn wrong_arity_never_reaches_native_code() {
        let desc = CallDesc {
            symbol: "guarded",
            ret: RetTag::Status,
            params: TWO_ARGS,
        };
        let bound = desc.bind(&table()).unwrap();
        let before = GUARDED_CALLS.load(Ordering::SeqCst);
        let err = bound.invoke(&mut [Arg::Int(1)]).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
        assert_eq!(GUARDED_CALLS.load(Ordering::SeqCst), before);
    }

    #[test]
    fn plain_value_for_by_ref_param_is_not_addressable() {
        let desc = CallDesc {
            symbol: "guarded",
            ret: RetTag::Status,
            params: TWO_ARGS,
        };
        let bound = desc.bind(&table()).unwrap();
        let before = GUARDED_CALLS.load(Ordering::SeqCst);
        let err = bound.invoke(&mut [Arg::Int(1), Arg::Int(2)]).unwrap_err();
        assert!(matches!(err, Error::NotAddressable { param: "out", .. }));
        assert_eq!(GUARDED_CALLS.load(Ordering::SeqCst), before);
    }

    #[test]
    fn out_of_range_scalar_is_invalid() {
        let desc = CallDesc {
            symbol: "add_one",
            ret: RetTag::Status,
            params: TWO_ARGS,
        };
        let bound = desc.bind(&table()).unwrap();
        let mut out = 0u32;
        let err = bound
            .invoke(&mut [Arg::Int(1 << 40), Arg::OutU32(&mut out)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { param: "a", .. }));
    }

    #[test]
    fn out_of_range_float_is_invalid() {
        let desc = CallDesc {
            symbol: "scale",
            ret: RetTag::Status,
            params: &[
                Param {
                    name: "out",
                    tag: TypeTag::F32,
                    pass: PassBy::Ref,
                },
                Param {
                    name: "factor",
                    tag: TypeTag::F32,
                    pass: PassBy::Value,
                },
            ],
        };
        let bound = desc.bind(&table()).unwrap();
        let mut value = 2.0f32;
        let err = bound
            .invoke(&mut [Arg::OutF32(&mut value), Arg::Float(1e300)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidValue { param: "factor", .. }));
        // The native side never ran.
        assert_eq!(value, 2.0);
    }

    #[test]
    fn trailing_float_is_dispatched() {
        let desc = CallDesc {
            symbol: "scale",
            ret: RetTag::Status,
            params: &[
                Param {
                    name: "out",
                    tag: TypeTag::F32,
                    pass: PassBy::Ref,
                },
                Param {
                    name: "factor",
                    tag: TypeTag::F32,
                    pass: PassBy::Value,
                },
            ],
        };
        let bound = desc.bind(&table()).unwrap();
        let mut value = 2.0f32;
        bound
            .invoke(&mut [Arg::OutF32(&mut value), Arg::Float(2.5)])
            .unwrap();
        assert_eq!(value, 5.0);
    }

    #[test]
    fn non_trailing_float_is_rejected_at_bind_time() {
        let desc = CallDesc {
            symbol: "scale",
            ret: RetTag::Status,
            params: &[
                Param {
                    name: "factor",
                    tag: TypeTag::F32,
                    pass: PassBy::Value,
                },
                Param {
                    name: "out",
                    tag: TypeTag::F32,
                    pass: PassBy::Ref,
                },
            ],
        };
        assert!(matches!(
            desc.bind(&table()).unwrap_err(),
            Error::UnsupportedSignature { .. }
        ));
    }

    #[test]
    fn too_many_words_with_trailing_float_is_rejected() {
        const SIX_PTRS_AND_FLOAT: &[Param] = &[
            Param { name: "a", tag: TypeTag::Ptr, pass: PassBy::Value },
            Param { name: "b", tag: TypeTag::Ptr, pass: PassBy::Value },
            Param { name: "c", tag: TypeTag::Ptr, pass: PassBy::Value },
            Param { name: "d", tag: TypeTag::Ptr, pass: PassBy::Value },
            Param { name: "e", tag: TypeTag::Ptr, pass: PassBy::Value },
            Param { name: "g", tag: TypeTag::Ptr, pass: PassBy::Value },
            Param { name: "f", tag: TypeTag::F32, pass: PassBy::Value },
        ];
        let desc = CallDesc {
            symbol: "scale",
            ret: RetTag::Status,
            params: SIX_PTRS_AND_FLOAT,
        };
        assert!(matches!(
            desc.bind(&table()).unwrap_err(),
            Error::UnsupportedSignature { .. }
        ));
    }

    #[test]
    fn missing_symbol_fails_bind() {
        let desc = CallDesc {
            symbol: "does_not_exist",
            ret: RetTag::Status,
            params: &[],
        };
        assert!(matches!(
            desc.bind(&table()).unwrap_err(),
            Error::SymbolNotFound { .. }
        ));
    }

    #[test]
    fn raw_status_is_propagated_unchanged() {
        let desc = CallDesc {
            symbol: "always_timeout",
            ret: RetTag::Status,
            params: &[],
        };
        let bound = desc.bind(&table()).unwrap();
        assert_eq!(bound.invoke(&mut []).unwrap(), 18);
    }
}
