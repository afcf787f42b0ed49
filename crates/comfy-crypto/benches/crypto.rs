use comfy_crypto::EncryptionService;

fn make_text(size: usize) -> String {
    "Olá, tudo bem? ".chars().cycle().take(size).collect()
}

#[divan::bench(args = [16, 256, 4096])]
fn bench_encrypt_message(bencher: divan::Bencher, size: usize) {
    let svc = EncryptionService::default();
    let text = make_text(size);
    bencher.bench(|| {
        svc.encrypt_message(divan::black_box(&text), divan::black_box("chat-42"))
            .unwrap()
    });
}

#[divan::bench(args = [16, 256, 4096])]
fn bench_process_for_display(bencher: divan::Bencher, size: usize) {
    let svc = EncryptionService::default();
    let stored = svc.encrypt_message(&make_text(size), "chat-42").unwrap();
    bencher.bench(|| {
        svc.process_message_for_display(divan::black_box(&stored), divan::black_box("chat-42"))
    });
}

fn main() {
    divan::main();
}
