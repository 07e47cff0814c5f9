use evalclassifier::modem::IqModem;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn qpsk_round_trip_recovers_message() {
    let modem = IqModem::qpsk().unwrap();
    let mut rng = StdRng::seed_from_u64(17);
    let bits: Vec<u8> = (0..256).map(|_| rng.gen_range(0..2)).collect();

    let wave = modem.modulate(&bits).unwrap();
    let symbols = bits.len() / 2;
    assert_eq!(wave.len(), (symbols - 1) * modem.upsample_factor() + 375);
    assert!(wave.iter().all(|v| v.is_finite()));

    let recovered = modem.demodulate(&wave);
    assert!(recovered.len() >= bits.len());
    assert_eq!(&recovered[..bits.len()], bits.as_slice());
}

#[test]
fn bpsk_round_trip_recovers_message() {
    let modem = IqModem::new(2, 100, 8000, 1500).unwrap();
    assert_eq!(modem.bitrate(), 100);
    let bits: Vec<u8> = (0..64).map(|i| ((i * 7) % 3 == 0) as u8).collect();
    let recovered = modem.demodulate(&modem.modulate(&bits).unwrap());
    assert_eq!(&recovered[..bits.len()], bits.as_slice());
}

#[test]
fn odd_bit_count_is_rejected() {
    let modem = IqModem::qpsk().unwrap();
    assert!(modem.modulate(&[1, 0, 1]).is_err());
}
