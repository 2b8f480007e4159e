//! Bitwise round trips of square float32 matrices through every
//! fixed-layout codec

use std::io::Cursor;

use ndarray::Array2;
use proptest::prelude::*;
use zonemat::{
    read_emx, read_fortran_square, read_mdf, write_emx, write_fortran, write_mdf, AxisLabels,
    Frame, FortranWriteOptions, MatrixInput, OutputMode, ZoneSpec,
};

fn bits(values: impl IntoIterator<Item = f32>) -> Vec<u32> {
    values.into_iter().map(f32::to_bits).collect()
}

fn square_matrix() -> impl Strategy<Value = Array2<f32>> {
    (1usize..12).prop_flat_map(|n| {
        prop::collection::vec(prop::num::f32::NORMAL | prop::num::f32::ZERO, n * n)
            .prop_map(move |values| Array2::from_shape_vec((n, n), values).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mdf_roundtrip_is_bitwise(data in square_matrix()) {
        let n = data.nrows();
        let zones = AxisLabels::consecutive(101, n);
        let frame = Frame::square(data.clone(), zones.clone()).unwrap();

        let mut bytes = Vec::new();
        write_mdf(&mut bytes, &MatrixInput::Wide(frame)).unwrap();

        let decoded = read_mdf(&mut Cursor::new(bytes), OutputMode::default())
            .unwrap()
            .into_f32()
            .unwrap()
            .into_frame()
            .unwrap();
        prop_assert_eq!(decoded.rows(), &zones);
        prop_assert_eq!(decoded.cols(), &zones);
        prop_assert_eq!(bits(decoded.data().iter().copied()), bits(data.iter().copied()));
    }

    #[test]
    fn emx_roundtrip_is_bitwise(data in square_matrix()) {
        let n = data.nrows();
        let mut bytes = Vec::new();
        write_emx(&mut bytes, &MatrixInput::from(data.clone()), n as i64).unwrap();
        prop_assert_eq!(bytes.len(), n * n * 4);

        let decoded = read_emx(&mut Cursor::new(bytes), &ZoneSpec::Inferred, false)
            .unwrap()
            .into_raw()
            .unwrap();
        prop_assert_eq!(decoded.shape(), &[n, n]);
        prop_assert_eq!(bits(decoded.iter().copied()), bits(data.iter().copied()));
    }

    #[test]
    fn fortran_square_roundtrip_is_bitwise(data in square_matrix()) {
        let n = data.nrows();
        let mut bytes = Vec::new();
        write_fortran(&mut bytes, &MatrixInput::from(data.clone()), &FortranWriteOptions::default())
            .unwrap();
        prop_assert_eq!(bytes.len(), n * (n + 1) * 4);

        let decoded = read_fortran_square(&mut Cursor::new(bytes), &ZoneSpec::Inferred, false)
            .unwrap()
            .into_raw()
            .unwrap();
        prop_assert_eq!(bits(decoded.iter().copied()), bits(data.iter().copied()));
    }
}
