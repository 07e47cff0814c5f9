use std::fs;
use std::path::PathBuf;

use evalclassifier::data::{
    from_categorical, load_csv, to_categorical, train_test_split, DataLoader, Dataset,
};
use evalclassifier::error::Error;
use evalclassifier::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

fn temp_csv(contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("evalclassifier_{}.csv", Uuid::new_v4()));
    fs::write(&path, contents).unwrap();
    path
}

fn toy_dataset(n: usize, window: usize, label: usize) -> Dataset {
    let data = (0..n * 2 * window).map(|v| v as f32).collect();
    let samples = Tensor::new(data, vec![n, 2, window]).unwrap();
    Dataset::new(samples, vec![label; n]).unwrap()
}

#[test]
fn load_csv_windows_each_row() {
    let path = temp_csv("1,2,3,4,99\n5,6,7,8\n");
    let ds = load_csv(&path, true, 2).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.labels(), &[1, 1]);
    assert_eq!(ds.samples().shape, vec![2, 2, 2]);
    assert_eq!(ds.samples().get(&[0, 1, 0]), 3.0);
    assert_eq!(ds.samples().item(1), &[5.0, 6.0, 7.0, 8.0]);

    let real = load_csv(&path, false, 2).unwrap();
    assert_eq!(real.labels(), &[0, 0]);
    fs::remove_file(path).unwrap();
}

#[test]
fn load_csv_reports_short_rows_and_bad_values() {
    let short = temp_csv("1,2,3,4\n1,2,3\n");
    match load_csv(&short, false, 2) {
        Err(Error::ShortRow {
            line,
            expected,
            found,
            ..
        }) => {
            assert_eq!(line, 2);
            assert_eq!(expected, 4);
            assert_eq!(found, 3);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    fs::remove_file(short).unwrap();

    let bad = temp_csv("1,2,x,4\n");
    assert!(matches!(
        load_csv(&bad, false, 2),
        Err(Error::Parse { column: 2, .. })
    ));
    fs::remove_file(bad).unwrap();
}

#[test]
fn load_csv_names_the_file_on_malformed_records() {
    let path = std::env::temp_dir().join(format!("evalclassifier_{}.csv", Uuid::new_v4()));
    fs::write(&path, b"1,2,3,4\n1,\xff\xfe,3,4\n").unwrap();
    match load_csv(&path, false, 2) {
        Err(err @ Error::CsvRecord { .. }) => {
            assert!(err.to_string().contains(&*path.to_string_lossy()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    fs::remove_file(path).unwrap();
}

#[test]
fn load_csv_missing_file_is_io_error() {
    let path = std::env::temp_dir().join(format!("missing_{}.csv", Uuid::new_v4()));
    assert!(matches!(load_csv(&path, false, 4), Err(Error::Io { .. })));
}

#[test]
fn dataset_rejects_length_mismatch() {
    let samples = Tensor::zeros(vec![3, 2, 4]);
    assert!(matches!(
        Dataset::new(samples, vec![0, 1]),
        Err(Error::LengthMismatch {
            samples: 3,
            labels: 2
        })
    ));
}

#[test]
fn concat_adds_lengths_and_keeps_order() {
    let fake = toy_dataset(3, 4, 1);
    let real = toy_dataset(5, 4, 0);
    let both = Dataset::concat(&fake, &real).unwrap();
    assert_eq!(both.len(), 8);
    assert_eq!(both.samples().len(), 8);
    assert_eq!(both.labels(), &[1, 1, 1, 0, 0, 0, 0, 0]);
    assert_eq!(both.samples().item(3), real.samples().item(0));

    let other = toy_dataset(2, 6, 0);
    assert!(matches!(
        Dataset::concat(&fake, &other),
        Err(Error::WindowMismatch { .. })
    ));
}

#[test]
fn split_is_disjoint_and_seventy_thirty() {
    let n = 23;
    let mut labels = vec![0; n];
    labels.iter_mut().skip(10).for_each(|l| *l = 1);
    // Channel 0 starts with the sample's own index so rows can be traced.
    let data = (0..n)
        .flat_map(|i| (0..8).map(move |j| if j == 0 { i as f32 } else { 0.0 }))
        .collect();
    let ds = Dataset::new(Tensor::new(data, vec![n, 2, 4]).unwrap(), labels.clone()).unwrap();

    let mut rng = StdRng::seed_from_u64(42);
    let split = train_test_split(&ds, 0.3, &mut rng).unwrap();
    assert_eq!(split.test.len(), 7);
    assert_eq!(split.train.len(), 16);

    let mut seen: Vec<usize> = split
        .train
        .samples()
        .data
        .chunks(8)
        .chain(split.test.samples().data.chunks(8))
        .map(|row| row[0] as usize)
        .collect();
    for (part, ids) in [(&split.train, 0..16), (&split.test, 16..23)] {
        for (k, id) in ids.enumerate() {
            assert_eq!(part.labels()[k], labels[seen[id]]);
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..n).collect::<Vec<_>>());
}

#[test]
fn split_keeps_seventy_thirty_for_every_size() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in 10..=200 {
        let ds = toy_dataset(n, 2, 0);
        let split = train_test_split(&ds, 0.3, &mut rng).unwrap();
        assert_eq!(split.train.len() + split.test.len(), n);
        let deviation = (split.test.len() as f64 - 0.3 * n as f64).abs();
        assert!(deviation <= 1.0, "n={n} test={}", split.test.len());
    }
}

#[test]
fn split_of_empty_dataset_fails() {
    let empty = Dataset::concat(&Dataset::empty(4), &Dataset::empty(4)).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert!(matches!(
        train_test_split(&empty, 0.3, &mut rng),
        Err(Error::EmptySplit { n_samples: 0, .. })
    ));
    let single = toy_dataset(1, 4, 0);
    assert!(matches!(
        train_test_split(&single, 0.3, &mut rng),
        Err(Error::EmptySplit { n_train: 0, n_test: 1, .. })
    ));
}

#[test]
fn one_hot_round_trips_labels() {
    let labels = [0, 1, 1, 0, 1];
    let m = to_categorical(&labels, 2).unwrap();
    assert_eq!((m.rows, m.cols), (5, 2));
    assert_eq!(m.row(1), &[0.0, 1.0]);
    assert_eq!(from_categorical(&m), labels);
    assert!(matches!(
        to_categorical(&[0, 2], 2),
        Err(Error::Label { label: 2, num_class: 2 })
    ));
}

#[test]
fn dataloader_covers_every_index_once() {
    let mut rng = StdRng::seed_from_u64(9);
    let batches: Vec<Vec<usize>> = DataLoader::new(10, 4, true, &mut rng).collect();
    assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 2]);
    let mut all: Vec<usize> = batches.into_iter().flatten().collect();
    all.sort_unstable();
    assert_eq!(all, (0..10).collect::<Vec<_>>());
}
