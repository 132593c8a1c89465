//! Edge case tests for vmtc-gen

#[cfg(test)]
mod tests {
    use crate::{CodeGenError, CodeWriter, WriterOptions};
    use std::io::{self, Write};
    use vmtc_lex::{ArithmeticOp, Segment};

    fn writer() -> CodeWriter<Vec<u8>> {
        CodeWriter::with_options(
            Vec::new(),
            WriterOptions {
                emit_comments: false,
            },
        )
    }

    // ==================== SEGMENT BOUNDS ====================

    /// EDGE CASE: pop into constant
    #[test]
    fn test_edge_pop_constant() {
        let mut w = writer();
        let err = w.write_pop(Segment::Constant, 5).unwrap_err();
        assert!(matches!(err, CodeGenError::PopConstant(5)));
    }

    /// EDGE CASE: temp has eight words
    #[test]
    fn test_edge_temp_bounds() {
        let mut w = writer();
        w.write_push(Segment::Temp, 7).unwrap();
        let err = w.write_push(Segment::Temp, 8).unwrap_err();
        assert!(matches!(
            err,
            CodeGenError::IndexOutOfRange {
                segment: Segment::Temp,
                index: 8,
                ..
            }
        ));
    }

    /// EDGE CASE: pointer only has THIS and THAT
    #[test]
    fn test_edge_pointer_bounds() {
        let mut w = writer();
        let err = w.write_push(Segment::Pointer, 2).unwrap_err();
        assert_eq!(err.to_string(), "pointer index 2 out of range (valid: 0..=1)");
        assert!(w.write_pop(Segment::Pointer, 2).is_err());
    }

    /// EDGE CASE: largest and first invalid constant
    #[test]
    fn test_edge_constant_bounds() {
        let mut w = writer();
        w.write_push(Segment::Constant, 32767).unwrap();
        w.write_push(Segment::Constant, 0).unwrap();
        let err = w.write_push(Segment::Constant, 40000).unwrap_err();
        assert!(matches!(
            err,
            CodeGenError::IndexOutOfRange {
                segment: Segment::Constant,
                ..
            }
        ));
    }

    /// EDGE CASE: based offset that cannot be loaded with `@i`
    #[test]
    fn test_edge_based_offset_too_wide() {
        let mut w = writer();
        w.write_push(Segment::That, 32767).unwrap();
        assert!(w.write_pop(Segment::Local, 32768).is_err());
    }

    /// EDGE CASE: static with no unit set
    #[test]
    fn test_edge_static_without_unit() {
        let mut w = writer();
        let err = w.write_push(Segment::Static, 0).unwrap_err();
        assert!(matches!(err, CodeGenError::NoSourceUnit));
    }

    /// EDGE CASE: failed command writes nothing
    #[test]
    fn test_edge_failed_command_is_atomic() {
        let mut w = writer();
        w.write_push(Segment::Constant, 1).unwrap();
        let before = w.lines_written();
        assert!(w.write_push(Segment::Temp, 9).is_err());
        assert!(w.write_call("f", u32::MAX).is_err());
        assert_eq!(w.lines_written(), before);
        // and did not burn a label
        assert_eq!(w.label_counter(), 1);

        let asm = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(asm.lines().count(), before);
    }

    // ==================== LABELS ====================

    /// EDGE CASE: many comparisons stay unique
    #[test]
    fn test_edge_repeated_eq_labels_unique() {
        let mut w = writer();
        for _ in 0..50 {
            w.write_arithmetic(ArithmeticOp::Eq).unwrap();
        }
        let asm = String::from_utf8(w.finish().unwrap()).unwrap();
        let mut labels: Vec<&str> = asm.lines().filter(|l| l.starts_with('(')).collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(total, 100);
        assert_eq!(labels.len(), total);
    }

    /// EDGE CASE: counter is not reset by a unit change
    #[test]
    fn test_edge_counter_survives_unit_change() {
        let mut w = writer();
        w.set_unit("A");
        w.write_call("B.f", 0).unwrap();
        w.set_unit("B");
        w.write_call("A.f", 0).unwrap();
        let asm = String::from_utf8(w.finish().unwrap()).unwrap();
        assert!(asm.contains("(RETURN_ADDRESS_1)"));
        assert!(asm.contains("(RETURN_ADDRESS_2)"));
    }

    /// EDGE CASE: user labels are emitted verbatim
    #[test]
    fn test_edge_label_verbatim() {
        let mut w = writer();
        w.write_label("Main.loop$WHILE_EXP0").unwrap();
        let asm = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(asm, "(Main.loop$WHILE_EXP0)\n");
    }

    // ==================== CALLING CONVENTION ====================

    /// EDGE CASE: function with no locals is only a label
    #[test]
    fn test_edge_function_zero_locals() {
        let mut w = writer();
        w.write_function("Sys.init", 0).unwrap();
        let asm = String::from_utf8(w.finish().unwrap()).unwrap();
        assert_eq!(asm, "(Sys.init)\n");
    }

    /// EDGE CASE: absurd local count
    #[test]
    fn test_edge_function_too_many_locals() {
        let mut w = writer();
        let err = w.write_function("f", 40000).unwrap_err();
        assert!(matches!(err, CodeGenError::ConstantTooLarge { value: 40000, .. }));
    }

    /// EDGE CASE: bootstrap twice
    #[test]
    fn test_edge_bootstrap_twice() {
        let mut w = writer();
        w.write_init("Sys.init", 256).unwrap();
        let err = w.write_init("Sys.init", 256).unwrap_err();
        assert!(matches!(err, CodeGenError::BootstrapAlreadyWritten));
    }

    /// EDGE CASE: stack base outside the A-instruction range
    #[test]
    fn test_edge_bootstrap_stack_base_too_high() {
        let mut w = writer();
        assert!(w.write_init("Sys.init", 40000).is_err());
        assert!(!w.has_bootstrap());
    }

    // ==================== OUTPUT ====================

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// EDGE CASE: output stream errors surface as CodeGenError::Io
    #[test]
    fn test_edge_io_error() {
        let mut w = CodeWriter::new(FailingWriter);
        let err = w.write_push(Segment::Constant, 1).unwrap_err();
        assert!(matches!(err, CodeGenError::Io(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
