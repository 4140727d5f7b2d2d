#![feature(test)]

extern crate motifscan;
extern crate rand;
extern crate test;

use motifscan::abc::Dna;
use motifscan::pwm::dist::Resolution;
use motifscan::pwm::dist::ScoreDistribution;
use motifscan::pwm::CountMatrix;
use motifscan::pwm::FrequencyMatrix;
use motifscan::scan::MotifScanner;
use motifscan::seq::EncodedSequence;
use motifscan::Background;
use rand::rngs::StdRng;
use rand::SeedableRng;

const PATTERNS: &[&str] = &["GTTGACCTTATCAAC", "GTTGATCCAGTCAAC"];

fn build_ppm() -> FrequencyMatrix<Dna> {
    CountMatrix::<Dna>::from_sequences(
        PATTERNS
            .iter()
            .map(|s| EncodedSequence::<Dna>::encode(s).unwrap()),
    )
    .unwrap()
    .to_freq(0.1)
}

fn build_sequence(length: usize) -> String {
    let mut rng = StdRng::seed_from_u64(42);
    EncodedSequence::<Dna>::sample(&mut rng, &Background::uniform(), length)
        .unwrap()
        .to_string()
}

mod distribution {
    use super::*;

    fn bench(bencher: &mut test::Bencher, resolution: Resolution) {
        let bg = Background::<Dna>::uniform();
        let mut pssm = build_ppm().to_scoring(&bg).unwrap();
        if let Resolution::Granular(g) = resolution {
            pssm = pssm.discretize(g).unwrap();
        }
        bencher.iter(|| {
            test::black_box(ScoreDistribution::with_resolution(&pssm, resolution).unwrap());
        });
    }

    #[bench]
    fn exact(bencher: &mut test::Bencher) {
        bench(bencher, Resolution::Exact);
    }

    #[bench]
    fn granular(bencher: &mut test::Bencher) {
        bench(bencher, Resolution::Granular(0.01));
    }
}

mod scanner {
    use super::*;

    #[bench]
    fn exact(bencher: &mut test::Bencher) {
        let bg = Background::<Dna>::uniform();
        let ppm = build_ppm();
        let sequence = build_sequence(100_000);
        let scanner = MotifScanner::new(&sequence);

        bencher.bytes = sequence.len() as u64;
        bencher.iter(|| {
            test::black_box(scanner.scan(1e-5, &bg, &ppm).unwrap().count());
        });
    }
}
