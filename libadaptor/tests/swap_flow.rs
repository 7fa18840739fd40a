//! End-to-end adaptor flows, with every completed signature checked by libsecp256k1.

use libadaptor::{
    AdaptorPoint, AdaptorSecret, Bip340AdaptorEngine, PointRelation, PreSignature, Secp256k1, Signature, SigningKey,
    XOnlyPoint,
};
use rand::RngCore;
use secp256k1::{schnorr, Keypair, Message, XOnlyPublicKey};

const KEY: &str = "b7e151628aed2a6abf7158809cf4f3c762e7160f38b4da56a784d9045190cfef";
const MSG: &str = "243f6a8885a308d313198a2e03707344a4093822299f31d0082efa98ec4e6c89";
const FIVE_G: &str = "022f8bde4d1a07209355b4a7250a5c5128e88b84bddc619ab7cba8d569b240efe4";

fn libsecp_verify(sig: &Signature<Secp256k1>, pubkey: &XOnlyPoint, msg: &[u8; 32]) -> bool {
    let secp = secp256k1::Secp256k1::verification_only();
    let sig = schnorr::Signature::from_slice(&sig.to_bytes()).unwrap();
    let pubkey = XOnlyPublicKey::from_slice(pubkey.as_bytes()).unwrap();
    secp.verify_schnorr(&sig, &Message::from_digest(*msg), &pubkey).is_ok()
}

fn random_digest() -> [u8; 32] {
    let mut msg = [0u8; 32];
    rand::rng().fill_bytes(&mut msg);
    msg
}

#[test]
fn fixed_scenario_verifies_under_libsecp256k1() {
    env_logger::try_init().ok();
    let engine = Bip340AdaptorEngine::new();
    let key = SigningKey::<Secp256k1>::from_hex(KEY).unwrap();
    let mut msg = [0u8; 32];
    hex::decode_to_slice(MSG, &mut msg).unwrap();
    let mut five = [0u8; 32];
    five[31] = 5;
    let t = AdaptorSecret::<Secp256k1>::from_bytes(&five).unwrap();
    let adaptor = AdaptorPoint::<Secp256k1>::from_hex(FIVE_G).unwrap();
    assert_eq!(t.point(), adaptor);

    let pre_sig = engine.pre_sign(&key, &msg, &adaptor.to_x_only()).unwrap();
    assert!(engine.pre_verify(&pre_sig, key.public_key(), &msg));
    let sig = engine.adapt(&pre_sig, &t).unwrap();
    assert!(libsecp_verify(&sig, key.public_key(), &msg));

    let extracted = engine.extract_adaptor(&pre_sig, &sig).unwrap();
    assert_eq!(extracted.relation(), PointRelation::NegatedLift);
    assert_eq!(extracted.resolve(&adaptor).unwrap().as_hex().as_str(), hex::encode(five));
}

/// Alice knows `t` and wants Bob's coins; Bob wants Alice's. Both pre-sign under `T`. Alice claims first, which
/// reveals `t` to Bob through her completed signature.
#[test]
fn atomic_swap() {
    env_logger::try_init().ok();
    let engine = Bip340AdaptorEngine::new();
    let mut rng = rand::rng();
    let alice = SigningKey::<Secp256k1>::random(&mut rng);
    let bob = SigningKey::<Secp256k1>::random(&mut rng);
    let t = AdaptorSecret::<Secp256k1>::random(&mut rng);
    let adaptor = t.point();
    let pays_alice = random_digest();
    let pays_bob = random_digest();

    // Bob pre-signs the payment to Alice and sends it over the wire
    let bob_pre_sig = engine.pre_sign(&bob, &pays_alice, &adaptor.to_x_only()).unwrap();
    let wire = bob_pre_sig.to_bytes();
    assert!(engine.pre_verify_bytes(&wire, bob.public_key().as_bytes(), &pays_alice));
    let received = PreSignature::<Secp256k1>::from_bytes(&wire).unwrap();

    // Alice pre-signs the payment to Bob under the same adaptor point
    let alice_pre_sig = engine.pre_sign(&alice, &pays_bob, received.adaptor_point()).unwrap();
    assert!(engine.pre_verify(&alice_pre_sig, alice.public_key(), &pays_bob));

    // Alice completes Bob's pre-signature and broadcasts it
    let claimed = engine.adapt(&received, &t).unwrap();
    assert!(libsecp_verify(&claimed, bob.public_key(), &pays_alice));

    // Bob sees the broadcast signature, extracts t and completes Alice's pre-signature
    let extracted = engine.extract_adaptor(&bob_pre_sig, &claimed).unwrap();
    let recovered = extracted.resolve(&adaptor).unwrap();
    assert_eq!(recovered, t);
    let bob_claim = engine.adapt(&alice_pre_sig, extracted.secret()).unwrap();
    assert!(libsecp_verify(&bob_claim, alice.public_key(), &pays_bob));
    assert!(engine.verify(&bob_claim, alice.public_key(), &pays_bob));
}

#[test]
fn public_keys_match_libsecp256k1() {
    let secp = secp256k1::Secp256k1::new();
    let mut rng = rand::rng();
    for _ in 0..16 {
        let key = SigningKey::<Secp256k1>::random(&mut rng);
        let keypair = Keypair::from_seckey_slice(&secp, &key.to_bytes()[..]).unwrap();
        let (x_only, _) = keypair.x_only_public_key();
        assert_eq!(&x_only.serialize(), key.public_key().as_bytes());
    }
}

#[test]
fn engine_verifies_libsecp256k1_signatures() {
    let secp = secp256k1::Secp256k1::new();
    let engine = Bip340AdaptorEngine::new();
    let mut rng = rand::rng();
    for _ in 0..8 {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let Ok(keypair) = Keypair::from_seckey_slice(&secp, &seed) else { continue };
        let msg = random_digest();
        let sig = secp.sign_schnorr_no_aux_rand(&Message::from_digest(msg), &keypair);
        let ours = Signature::<Secp256k1>::from_bytes(&sig.serialize()).unwrap();
        let pubkey = XOnlyPoint::from_slice::<Secp256k1>(&keypair.x_only_public_key().0.serialize()).unwrap();
        assert!(engine.verify(&ours, &pubkey, &msg));
        assert!(!engine.verify(&ours, &pubkey, &random_digest()));
    }
}

#[test]
fn many_adaptor_points_round_trip() {
    let engine = Bip340AdaptorEngine::new();
    let mut rng = rand::rng();
    let key = SigningKey::<Secp256k1>::random(&mut rng);
    let msg = random_digest();
    for _ in 0..24 {
        let t = AdaptorSecret::<Secp256k1>::random(&mut rng);
        let mut aux = [0u8; 32];
        rng.fill_bytes(&mut aux);
        let pre_sig = engine.pre_sign_with_aux(&key, &msg, &t.point().to_x_only(), &aux).unwrap();
        assert!(engine.pre_verify(&pre_sig, key.public_key(), &msg));
        let sig = engine.adapt(&pre_sig, &t).unwrap();
        assert!(libsecp_verify(&sig, key.public_key(), &msg));
        let candidate = engine.extract_adaptor(&pre_sig, &sig).unwrap().into_secret().point();
        assert!(candidate == t.point() || candidate == t.point().negate());
    }
}
